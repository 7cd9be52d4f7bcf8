use std::collections::VecDeque;

use serde::Serialize;
use teamtrack_core::{AppError, AppResult, CurrentUser};
use teamtrack_domain::PermissionKey;
use tokio::sync::RwLock;
use tracing::info;

use crate::permission_resolver::SessionContext;

/// Severity of a transient status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral notice.
    Info,
}

/// Transient message shown after a user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    /// Severity.
    pub level: StatusLevel,
    /// Display text.
    pub text: String,
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<CurrentUser>,
    token: Option<String>,
    seat_permissions: Vec<PermissionKey>,
    status: VecDeque<StatusMessage>,
}

/// Auth and session state shared by the whole client.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Creates a signed-out store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the signed-in user and bearer token, dropping any previous
    /// seat permissions.
    pub async fn sign_in(&self, user: CurrentUser, token: Option<String>) {
        let mut state = self.state.write().await;
        info!(user_id = %user.user_id(), "session signed in");
        state.user = Some(user);
        state.token = token;
        state.seat_permissions.clear();
    }

    /// Clears the whole session.
    pub async fn sign_out(&self) {
        let mut state = self.state.write().await;
        if let Some(user) = state.user.take() {
            info!(user_id = %user.user_id(), "session signed out");
        }
        *state = SessionState::default();
    }

    /// Returns the signed-in user.
    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.state.read().await.user.clone()
    }

    /// Returns the bearer token.
    pub async fn auth_token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    /// Replaces the seat permission keys of the signed-in user.
    pub async fn set_seat_permissions(&self, permissions: Vec<PermissionKey>) {
        self.state.write().await.seat_permissions = permissions;
    }

    /// Builds the explicit context consumed by permission checks.
    pub async fn session_context(&self) -> AppResult<SessionContext> {
        let state = self.state.read().await;
        let user = state
            .user
            .clone()
            .ok_or_else(|| AppError::Unauthorized("no user is signed in".to_owned()))?;

        Ok(SessionContext::new(user, state.seat_permissions.clone()))
    }

    /// Queues a status message for display.
    pub async fn dispatch_status(&self, level: StatusLevel, text: impl Into<String>) {
        self.state.write().await.status.push_back(StatusMessage {
            level,
            text: text.into(),
        });
    }

    /// Pops the oldest queued status message.
    pub async fn take_status(&self) -> Option<StatusMessage> {
        self.state.write().await.status.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use teamtrack_core::{AppError, CurrentUser, RecordId};
    use teamtrack_domain::PermissionKey;

    use super::{SessionStore, StatusLevel};

    fn user() -> CurrentUser {
        CurrentUser::new(RecordId::new(5), "Ana", Some("ana@example.com".to_owned()))
    }

    #[tokio::test]
    async fn session_context_requires_sign_in() {
        let store = SessionStore::new();

        let result = store.session_context().await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn session_context_carries_seat_permissions() {
        let store = SessionStore::new();
        store.sign_in(user(), Some("token".to_owned())).await;
        let keys: Vec<PermissionKey> = PermissionKey::new("accessBacklog.42").into_iter().collect();
        store.set_seat_permissions(keys.clone()).await;

        let Ok(context) = store.session_context().await else {
            panic!("signed-in store should build a context");
        };
        assert_eq!(context.user().user_id(), RecordId::new(5));
        assert_eq!(context.permissions(), keys.as_slice());
        assert_eq!(store.auth_token().await.as_deref(), Some("token"));
    }

    #[tokio::test]
    async fn sign_in_drops_previous_seat_permissions() {
        let store = SessionStore::new();
        store.sign_in(user(), None).await;
        store
            .set_seat_permissions(PermissionKey::new("manageProject.7").into_iter().collect())
            .await;

        store.sign_in(user(), None).await;

        let permissions = store
            .session_context()
            .await
            .map(|context| context.permissions().len())
            .unwrap_or(usize::MAX);
        assert_eq!(permissions, 0);
    }

    #[tokio::test]
    async fn sign_out_clears_everything() {
        let store = SessionStore::new();
        store.sign_in(user(), Some("token".to_owned())).await;
        store.dispatch_status(StatusLevel::Info, "hello").await;

        store.sign_out().await;

        assert!(store.current_user().await.is_none());
        assert!(store.auth_token().await.is_none());
        assert!(store.take_status().await.is_none());
    }

    #[tokio::test]
    async fn status_messages_are_taken_in_order() {
        let store = SessionStore::new();
        store.dispatch_status(StatusLevel::Success, "Task saved").await;
        store.dispatch_status(StatusLevel::Error, "Delete failed").await;

        let first = store.take_status().await;
        let second = store.take_status().await;

        assert_eq!(first.map(|message| message.text), Some("Task saved".to_owned()));
        assert_eq!(second.map(|message| message.level), Some(StatusLevel::Error));
        assert!(store.take_status().await.is_none());
    }
}
