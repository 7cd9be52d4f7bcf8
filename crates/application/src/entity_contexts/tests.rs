use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use serde_json::{Value, json};
use teamtrack_core::{AppError, CurrentUser, RecordId};
use teamtrack_domain::{
    PermissionKey, PermissionLevel, ResourceKind, Role, SeatStatus, TeamUserSeat,
};
use tokio::sync::Mutex;

use crate::permission_resolver::{ResourceAccess, ResourceRef};
use crate::resource_ports::{
    DeleteConfirmation, ResourceTransport, TransportError, TransportErrorKind,
};
use crate::session_store::SessionStore;

use super::{BacklogTaskStats, ResourceContexts};

#[derive(Default)]
struct RecordingTransport {
    gets: Mutex<HashMap<String, Value>>,
    writes: Mutex<Vec<(String, Value)>>,
}

impl RecordingTransport {
    async fn serve(&self, path: &str, body: Value) {
        self.gets.lock().await.insert(path.to_owned(), body);
    }

    async fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().await.clone()
    }
}

#[async_trait]
impl ResourceTransport for RecordingTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.gets.lock().await.get(path).cloned().ok_or_else(|| {
            TransportError::from_status(404, format!("nothing served at {path}"))
        })
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.writes.lock().await.push((format!("POST {path}"), body));
        Ok(json!({ "insertId": 1 }))
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.writes.lock().await.push((format!("PUT {path}"), body));
        Ok(json!({ "affectedRows": 1 }))
    }

    async fn delete(&self, _path: &str) -> Result<Value, TransportError> {
        Err(TransportError::new(
            TransportErrorKind::Network,
            "deletes are not served",
        ))
    }
}

struct NeverConfirm;

#[async_trait]
impl DeleteConfirmation for NeverConfirm {
    async fn confirm_delete(&self, _resource: &str, _item_id: RecordId) -> bool {
        false
    }
}

fn contexts(transport: Arc<RecordingTransport>) -> ResourceContexts {
    ResourceContexts::new(transport, Arc::new(NeverConfirm))
}

fn seat(seat_id: u64, user_id: u64, role_id: u64, status: SeatStatus) -> TeamUserSeat {
    TeamUserSeat {
        seat_id: Some(RecordId::new(seat_id)),
        team_id: RecordId::new(2),
        user_id: RecordId::new(user_id),
        role_id: Some(RecordId::new(role_id)),
        status,
    }
}

fn role(keys: &[&str]) -> Role {
    Role {
        role_id: Some(RecordId::new(40)),
        team_id: RecordId::new(2),
        name: "Developer".to_owned(),
        permissions: keys
            .iter()
            .filter_map(|key| PermissionKey::new(*key).ok())
            .collect::<Vec<_>>()
            .into(),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

async fn signed_in_store(user_id: u64) -> SessionStore {
    let store = SessionStore::new();
    store
        .sign_in(CurrentUser::new(RecordId::new(user_id), "Ana", None), None)
        .await;
    store
}

#[tokio::test]
async fn seat_permissions_come_from_the_active_seat_role() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "teams/2/seats",
            json!([
                to_json(&seat(1, 5, 41, SeatStatus::Pending)),
                to_json(&seat(2, 5, 40, SeatStatus::Active)),
            ]),
        )
        .await;
    transport
        .serve("roles/40", to_json(&role(&["accessProject.7", "Manage Team Members"])))
        .await;
    let contexts = contexts(transport);

    let permissions = contexts
        .seat_permissions(RecordId::new(2), RecordId::new(5))
        .await;

    let Ok(permissions) = permissions else {
        panic!("seat permissions should load");
    };
    let keys: Vec<&str> = permissions.iter().map(PermissionKey::as_str).collect();
    assert_eq!(keys, vec!["accessProject.7", "Manage Team Members"]);
    assert!(contexts.seats.items_by_id().await.is_empty());
    assert!(contexts.roles.item_by_id().await.loaded().is_none());
}

#[tokio::test]
async fn inactive_seat_holds_no_permissions() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "teams/2/seats",
            json!([to_json(&seat(2, 5, 40, SeatStatus::Inactive))]),
        )
        .await;
    transport
        .serve("roles/40", to_json(&role(&["manageProject.7"])))
        .await;
    let contexts = contexts(transport);

    let permissions = contexts
        .seat_permissions(RecordId::new(2), RecordId::new(5))
        .await;

    assert!(matches!(permissions, Ok(keys) if keys.is_empty()));
}

#[tokio::test]
async fn seat_permissions_fail_when_seats_cannot_be_read() {
    let contexts = contexts(Arc::new(RecordingTransport::default()));

    let permissions = contexts
        .seat_permissions(RecordId::new(2), RecordId::new(5))
        .await;

    assert!(matches!(permissions, Err(AppError::Transport(_))));
}

#[tokio::test]
async fn missing_role_yields_no_permissions() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "teams/2/seats",
            json!([to_json(&seat(2, 5, 40, SeatStatus::Active))]),
        )
        .await;
    let contexts = contexts(transport);

    let permissions = contexts
        .seat_permissions(RecordId::new(2), RecordId::new(5))
        .await;

    assert!(matches!(permissions, Ok(keys) if keys.is_empty()));
}

#[tokio::test]
async fn role_with_null_permissions_yields_no_keys() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "teams/2/seats",
            json!([to_json(&seat(2, 5, 40, SeatStatus::Active))]),
        )
        .await;
    transport
        .serve(
            "roles/40",
            json!({ "Role_ID": 40, "Team_ID": 2, "Role_Name": "Dev", "Role_Permissions": null }),
        )
        .await;
    let contexts = contexts(transport);

    let permissions = contexts
        .seat_permissions(RecordId::new(2), RecordId::new(5))
        .await;

    assert!(matches!(permissions, Ok(keys) if keys.is_empty()));
}

#[tokio::test]
async fn unreadable_role_yields_no_keys() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "teams/2/seats",
            json!([to_json(&seat(2, 5, 40, SeatStatus::Active))]),
        )
        .await;
    transport
        .serve("roles/40", json!({ "message": "role lookup failed" }))
        .await;
    transport
        .serve(
            "organisations/1",
            json!({ "Organisation_ID": 1, "User_ID": 99, "Organisation_Name": "Acme" }),
        )
        .await;
    let contexts = contexts(transport);
    let store = signed_in_store(5).await;

    let loaded = contexts
        .load_session_permissions(&store, RecordId::new(2))
        .await;
    let access = contexts
        .resource_access(
            &store,
            RecordId::new(1),
            Some(ResourceRef::new(ResourceKind::Backlog, RecordId::new(3))),
        )
        .await;

    assert!(matches!(loaded, Ok(0)));
    assert!(matches!(access, Ok(ResourceAccess::DENIED)));
}

#[tokio::test]
async fn session_permissions_feed_resource_access() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "teams/2/seats",
            json!([to_json(&seat(2, 5, 40, SeatStatus::Active))]),
        )
        .await;
    transport
        .serve("roles/40", to_json(&role(&["accessBacklog.3"])))
        .await;
    transport
        .serve(
            "organisations/1",
            json!({ "Organisation_ID": 1, "User_ID": 99, "Organisation_Name": "Acme" }),
        )
        .await;
    let contexts = contexts(transport);
    let store = signed_in_store(5).await;

    let loaded = contexts
        .load_session_permissions(&store, RecordId::new(2))
        .await;
    let backlog = contexts
        .resource_access(
            &store,
            RecordId::new(1),
            Some(ResourceRef::new(ResourceKind::Backlog, RecordId::new(3))),
        )
        .await;
    let project = contexts
        .resource_access(
            &store,
            RecordId::new(1),
            Some(ResourceRef::new(ResourceKind::Project, RecordId::new(3))),
        )
        .await;

    assert!(matches!(loaded, Ok(1)));
    assert!(matches!(
        backlog,
        Ok(ResourceAccess {
            can_access: true,
            can_manage: false
        })
    ));
    assert!(matches!(project, Ok(ResourceAccess::DENIED)));
}

#[tokio::test]
async fn organisation_owner_gets_full_access() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "organisations/1",
            json!({ "Organisation_ID": 1, "User_ID": 5, "Organisation_Name": "Acme" }),
        )
        .await;
    let contexts = contexts(transport);
    let store = signed_in_store(5).await;

    let access = contexts
        .resource_access(&store, RecordId::new(1), None)
        .await;

    assert!(matches!(access, Ok(ResourceAccess::FULL)));
}

#[tokio::test]
async fn resource_access_requires_a_session() {
    let contexts = contexts(Arc::new(RecordingTransport::default()));
    let store = SessionStore::new();

    let access = contexts
        .resource_access(&store, RecordId::new(1), None)
        .await;

    assert!(matches!(access, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn approving_a_pending_seat_saves_it_active() {
    let transport = Arc::new(RecordingTransport::default());
    let contexts = contexts(transport.clone());

    let approved = contexts
        .approve_seat(&seat(9, 5, 40, SeatStatus::Pending))
        .await;

    assert!(matches!(approved, Ok(true)));
    let writes = transport.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "PUT seats/9");
    assert_eq!(writes[0].1["Seat_Status"], json!("Active"));
}

#[tokio::test]
async fn invalid_seat_transition_sends_nothing() {
    let transport = Arc::new(RecordingTransport::default());
    let contexts = contexts(transport.clone());

    let result = contexts
        .deactivate_seat(&seat(9, 5, 40, SeatStatus::Pending))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(transport.writes().await.is_empty());
}

#[tokio::test]
async fn invite_posts_a_pending_seat_linked_to_the_team() {
    let transport = Arc::new(RecordingTransport::default());
    let contexts = contexts(transport.clone());

    let invited = contexts
        .invite_seat(RecordId::new(2), RecordId::new(8), None)
        .await;

    assert!(invited);
    let writes = transport.writes().await;
    assert_eq!(writes[0].0, "POST seats");
    assert_eq!(writes[0].1["Team_ID"], json!(2));
    assert_eq!(writes[0].1["Seat_Status"], json!("Pending"));
    assert!(writes[0].1.get("Seat_ID").is_none());
}

#[tokio::test]
async fn enabling_manage_saves_the_paired_access_key() {
    let transport = Arc::new(RecordingTransport::default());
    let contexts = contexts(transport.clone());

    let saved = contexts
        .set_role_level(
            &role(&[]),
            ResourceRef::new(ResourceKind::Project, RecordId::new(7)),
            PermissionLevel::Manage,
            true,
        )
        .await;

    assert!(saved);
    let writes = transport.writes().await;
    assert_eq!(writes[0].0, "PUT roles/40");
    assert_eq!(
        writes[0].1["Role_Permissions"],
        json!(["accessProject.7", "manageProject.7"])
    );
}

#[tokio::test]
async fn disabling_access_drops_manage_on_save() {
    let transport = Arc::new(RecordingTransport::default());
    let contexts = contexts(transport.clone());
    let Ok(key) = PermissionKey::new("accessBacklog.3") else {
        panic!("key should be valid");
    };

    let saved = contexts
        .toggle_role_permission(&role(&["accessBacklog.3", "manageBacklog.3"]), key, false)
        .await;

    assert!(saved);
    let writes = transport.writes().await;
    assert_eq!(writes[0].1["Role_Permissions"], json!([]));
}

#[tokio::test]
async fn unchanged_role_is_not_saved() {
    let transport = Arc::new(RecordingTransport::default());
    let contexts = contexts(transport.clone());
    let Ok(key) = PermissionKey::new("accessBacklog.3") else {
        panic!("key should be valid");
    };

    let saved = contexts
        .toggle_role_permission(&role(&["accessBacklog.3"]), key, true)
        .await;

    assert!(saved);
    assert!(transport.writes().await.is_empty());
}

#[tokio::test]
async fn backlog_stats_count_statuses_and_unassigned_tasks() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "backlogs/3/tasks",
            json!([
                { "Task_ID": 1, "Backlog_ID": 3, "Task_Title": "a", "Status_ID": 1 },
                {
                    "Task_ID": 2, "Backlog_ID": 3, "Task_Title": "b", "Status_ID": 1,
                    "Assigned_User_ID": 5
                },
                { "Task_ID": 3, "Backlog_ID": 3, "Task_Title": "c", "Status_ID": 2 },
            ]),
        )
        .await;
    let contexts = contexts(transport);

    let stats = contexts.backlog_task_stats(RecordId::new(3)).await;

    let Some(stats) = stats else {
        panic!("stats should load");
    };
    assert_eq!(
        stats,
        BacklogTaskStats {
            total: 3,
            unassigned: 2,
            by_status: [(RecordId::new(1), 2), (RecordId::new(2), 1)]
                .into_iter()
                .collect(),
        }
    );
    assert!(contexts.tasks.items_by_id().await.is_empty());
}

#[tokio::test]
async fn tracked_duration_skips_running_timers() {
    let transport = Arc::new(RecordingTransport::default());
    transport
        .serve(
            "tasks/4/timetracks",
            json!([
                {
                    "Time_ID": 1, "Task_ID": 4, "User_ID": 5,
                    "Time_Start": "2026-01-05T09:00:00Z", "Time_End": "2026-01-05T10:30:00Z"
                },
                {
                    "Time_ID": 2, "Task_ID": 4, "User_ID": 5,
                    "Time_Start": "2026-01-05T11:00:00Z", "Time_End": "2026-01-05T11:15:00Z"
                },
                { "Time_ID": 3, "Task_ID": 4, "User_ID": 5, "Time_Start": "2026-01-05T12:00:00Z" },
            ]),
        )
        .await;
    let contexts = contexts(transport);

    let total = contexts.tracked_duration(RecordId::new(4)).await;

    assert_eq!(total, Some(TimeDelta::minutes(105)));
}
