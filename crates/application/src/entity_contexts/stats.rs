use super::*;

/// Task counts for one backlog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BacklogTaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Tasks without an assignee.
    pub unassigned: usize,
    /// Task count per status id.
    pub by_status: BTreeMap<RecordId, usize>,
}

impl BacklogTaskStats {
    fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };

        for task in tasks {
            *stats.by_status.entry(task.status_id).or_default() += 1;
            if task.assigned_user_id.is_none() {
                stats.unassigned += 1;
            }
        }

        stats
    }
}

impl ResourceContexts {
    /// Counts tasks per status without disturbing the shared task list.
    pub async fn backlog_task_stats(&self, backlog_id: RecordId) -> Option<BacklogTaskStats> {
        let tasks = self
            .tasks
            .read_items_by_id(backlog_id, ListRead::reply())
            .await?;

        Some(BacklogTaskStats::from_tasks(&tasks))
    }

    /// Sums closed time tracks on a task; running timers are skipped.
    pub async fn tracked_duration(&self, task_id: RecordId) -> Option<TimeDelta> {
        let tracks = self
            .time_tracks
            .read_items_by_id(task_id, ListRead::reply())
            .await?;

        Some(
            tracks
                .iter()
                .filter_map(TaskTimeTrack::duration)
                .fold(TimeDelta::zero(), |total, duration| total + duration),
        )
    }
}
