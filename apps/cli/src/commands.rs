use serde_json::{Value, json};
use teamtrack_application::{
    ItemSlot, ListRead, RemoveOutcome, ResourceContexts, ResourceRef, SessionStore, StatusLevel,
};
use teamtrack_core::{AppError, AppResult, RecordId};
use teamtrack_domain::ResourceKind;

use crate::Command;

pub async fn run(
    command: Command,
    contexts: &ResourceContexts,
    store: &SessionStore,
) -> AppResult<()> {
    match command {
        Command::Backlogs { project } => {
            let backlogs = contexts
                .backlogs
                .read_items_by_id(project, ListRead::refresh())
                .await
                .ok_or_else(|| read_failed("backlogs", project))?;
            print_json(&backlogs)
        }
        Command::Tasks { backlog } => {
            let tasks = contexts
                .tasks
                .read_items_by_id(backlog, ListRead::refresh())
                .await
                .ok_or_else(|| read_failed("tasks", backlog))?;
            print_json(&tasks)
        }
        Command::Task { task_id } => show_task(contexts, task_id).await,
        Command::Stats { backlog } => {
            let stats = contexts
                .backlog_task_stats(backlog)
                .await
                .ok_or_else(|| read_failed("tasks", backlog))?;
            print_json(&stats)
        }
        Command::Access {
            organisation,
            team,
            project,
            backlog,
        } => {
            contexts.load_session_permissions(store, team).await?;
            let resource = project
                .map(|id| ResourceRef::new(ResourceKind::Project, id))
                .or_else(|| backlog.map(|id| ResourceRef::new(ResourceKind::Backlog, id)));
            let access = contexts
                .resource_access(store, organisation, resource)
                .await?;
            print_json(&json!({
                "can_access": access.can_access,
                "can_manage": access.can_manage,
            }))
        }
        Command::DeleteTask { task_id, backlog } => {
            match contexts.tasks.remove_item(task_id, backlog, None).await {
                RemoveOutcome::Cancelled => {
                    store
                        .dispatch_status(StatusLevel::Info, "Delete cancelled")
                        .await;
                }
                RemoveOutcome::Removed { confirmed: true, .. } => {
                    store
                        .dispatch_status(StatusLevel::Success, format!("Task {task_id} deleted"))
                        .await;
                }
                RemoveOutcome::Removed {
                    confirmed: false, ..
                } => {
                    store
                        .dispatch_status(
                            StatusLevel::Error,
                            format!("Task {task_id} could not be deleted"),
                        )
                        .await;
                }
            }
            flush_status(store).await
        }
        Command::ApproveSeat { seat_id, team } => {
            let seats = contexts
                .seats
                .read_items_by_id(team, ListRead::reply())
                .await
                .ok_or_else(|| read_failed("seats", team))?;
            let seat = seats
                .into_iter()
                .find(|seat| seat.seat_id == Some(seat_id))
                .ok_or_else(|| {
                    AppError::NotFound(format!("seat '{seat_id}' is not in team '{team}'"))
                })?;

            if contexts.approve_seat(&seat).await? {
                store
                    .dispatch_status(StatusLevel::Success, format!("Seat {seat_id} approved"))
                    .await;
            } else {
                store
                    .dispatch_status(
                        StatusLevel::Error,
                        format!("Seat {seat_id} could not be approved"),
                    )
                    .await;
            }
            flush_status(store).await
        }
    }
}

async fn show_task(contexts: &ResourceContexts, task_id: RecordId) -> AppResult<()> {
    let task = match contexts.tasks.read_item_by_id(task_id, false).await? {
        ItemSlot::Loaded(task) => task,
        ItemSlot::NotFound => {
            return Err(AppError::NotFound(format!("task '{task_id}' does not exist")));
        }
        ItemSlot::NotLoaded => return Err(read_failed("task", task_id)),
    };
    let tracked_minutes = contexts
        .tracked_duration(task_id)
        .await
        .map(|duration| duration.num_minutes());

    let mut output = serde_json::to_value(&task)
        .map_err(|error| AppError::Internal(format!("failed to render task: {error}")))?;
    if let Value::Object(fields) = &mut output {
        fields.insert("Tracked_Minutes".to_owned(), json!(tracked_minutes));
    }
    print_json(&output)
}

async fn flush_status(store: &SessionStore) -> AppResult<()> {
    while let Some(status) = store.take_status().await {
        print_json(&status)?;
    }
    Ok(())
}

fn read_failed(resource: &str, id: RecordId) -> AppError {
    AppError::Transport(format!("failed to read {resource} for '{id}'"))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}
