use std::sync::Arc;

use serde_json::json;
use teamtrack_application::{ListRead, ResourceContext, ResourceTransport, TransportErrorKind};
use teamtrack_core::RecordId;
use teamtrack_domain::{Backlog, Task};

use super::InMemoryResourceTransport;
use crate::FixedDeleteConfirmation;

fn task(task_id: u64, backlog_id: u64, title: &str) -> Task {
    Task {
        task_id: Some(RecordId::new(task_id)),
        backlog_id: RecordId::new(backlog_id),
        title: title.to_owned(),
        description: None,
        status_id: RecordId::new(1),
        assigned_user_id: None,
        due_date: None,
    }
}

fn seeded() -> InMemoryResourceTransport {
    let transport = InMemoryResourceTransport::new()
        .with_records(&[task(1, 3, "Write docs"), task(2, 3, "Ship"), task(3, 4, "Other")])
        .and_then(InMemoryResourceTransport::with_resource::<Backlog>);

    match transport {
        Ok(transport) => transport,
        Err(error) => panic!("failed to seed transport: {error}"),
    }
}

#[tokio::test]
async fn lists_records_under_their_parent() {
    let transport = seeded();

    let reply = transport.get("backlogs/3/tasks").await;

    let Ok(reply) = reply else {
        panic!("list should succeed");
    };
    let titles: Vec<&str> = reply
        .as_array()
        .map(|records| {
            records
                .iter()
                .filter_map(|record| record["Task_Title"].as_str())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(titles, vec!["Write docs", "Ship"]);
}

#[tokio::test]
async fn wrong_parent_segment_is_not_found() {
    let transport = seeded();

    let reply = transport.get("projects/3/tasks").await;

    assert!(matches!(reply, Err(error) if error.status == Some(404)));
}

#[tokio::test]
async fn unknown_item_is_a_bad_request() {
    let transport = seeded();

    let reply = transport.get("tasks/99").await;

    assert!(matches!(
        reply,
        Err(error) if error.kind == TransportErrorKind::BadRequest
    ));
}

#[tokio::test]
async fn post_assigns_the_next_id() {
    let transport = seeded();

    let reply = transport
        .post(
            "tasks",
            json!({ "Backlog_ID": 3, "Task_Title": "New", "Status_ID": 1 }),
        )
        .await;
    let created = transport.get("tasks/4").await;

    assert!(matches!(reply, Ok(value) if value["insertId"] == json!(4)));
    assert!(matches!(created, Ok(value) if value["Task_Title"] == json!("New")));
}

#[tokio::test]
async fn put_keeps_the_stored_id() {
    let transport = seeded();

    let reply = transport
        .put("tasks/2", json!({ "Task_ID": 77, "Task_Title": "Shipped" }))
        .await;
    let updated = transport.get("tasks/2").await;

    assert!(reply.is_ok());
    assert!(matches!(
        updated,
        Ok(value) if value["Task_ID"] == json!(2) && value["Task_Title"] == json!("Shipped")
    ));
}

#[tokio::test]
async fn delete_removes_the_record_once() {
    let transport = seeded();

    let first = transport.delete("tasks/1").await;
    let second = transport.delete("tasks/1").await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(error) if error.status == Some(404)));
}

#[tokio::test]
async fn drives_a_resource_context_end_to_end() {
    let transport = Arc::new(seeded());
    let tasks: ResourceContext<Task> =
        ResourceContext::new(transport, Arc::new(FixedDeleteConfirmation::always()));
    let backlog_id = RecordId::new(3);

    tasks
        .handle_change_new_item("Backlog_ID", json!(3), None)
        .await;
    tasks
        .handle_change_new_item("Task_Title", json!("Review"), None)
        .await;
    tasks
        .handle_change_new_item("Status_ID", json!(2), None)
        .await;
    let created = tasks.add_item(backlog_id, None).await;
    let after_create = tasks.items_by_id().await;

    tasks.remove_item(RecordId::new(1), backlog_id, None).await;
    let after_delete = tasks
        .read_items_by_id(backlog_id, ListRead::reply())
        .await
        .unwrap_or_default();

    assert!(created);
    assert_eq!(after_create.len(), 3);
    assert!(tasks.new_item().await.is_empty());
    assert_eq!(after_delete.len(), 2);
    assert!(
        after_delete
            .iter()
            .all(|task| task.task_id != Some(RecordId::new(1)))
    );
}
