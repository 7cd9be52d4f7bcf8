use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Authenticated user held by the client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    user_id: RecordId,
    display_name: String,
    email: Option<String>,
}

impl CurrentUser {
    /// Creates the session user from the sign-in response.
    #[must_use]
    pub fn new(user_id: RecordId, display_name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            email,
        }
    }

    /// Returns the server-assigned user id.
    #[must_use]
    pub fn user_id(&self) -> RecordId {
        self.user_id
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if the server returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
