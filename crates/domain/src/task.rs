use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use teamtrack_core::RecordId;

use crate::Resource;

/// Unit of work inside a backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned id.
    #[serde(rename = "Task_ID", default)]
    pub task_id: Option<RecordId>,
    /// Parent backlog.
    #[serde(rename = "Backlog_ID")]
    pub backlog_id: RecordId,
    /// Short title.
    #[serde(rename = "Task_Title")]
    pub title: String,
    /// Optional long description.
    #[serde(rename = "Task_Description", default)]
    pub description: Option<String>,
    /// Workflow status the task is in.
    #[serde(rename = "Status_ID")]
    pub status_id: RecordId,
    /// Assignee, if any.
    #[serde(rename = "Assigned_User_ID", default)]
    pub assigned_user_id: Option<RecordId>,
    /// Optional due date.
    #[serde(rename = "Task_Due_Date", default)]
    pub due_date: Option<NaiveDate>,
}

impl Resource for Task {
    const RESOURCE: &'static str = "tasks";
    const ID_FIELD: &'static str = "Task_ID";
    const PARENT: &'static str = "backlogs";
    const PARENT_ID_FIELD: &'static str = "Backlog_ID";

    fn id(&self) -> Option<RecordId> {
        self.task_id
    }
}

/// Comment left on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    /// Server-assigned id.
    #[serde(rename = "Comment_ID", default)]
    pub comment_id: Option<RecordId>,
    /// Task the comment belongs to.
    #[serde(rename = "Task_ID")]
    pub task_id: RecordId,
    /// Author.
    #[serde(rename = "User_ID")]
    pub user_id: RecordId,
    /// Comment body.
    #[serde(rename = "Comment_Text")]
    pub text: String,
    /// Server timestamp, absent on drafts.
    #[serde(rename = "Comment_CreatedAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for TaskComment {
    const RESOURCE: &'static str = "comments";
    const ID_FIELD: &'static str = "Comment_ID";
    const PARENT: &'static str = "tasks";
    const PARENT_ID_FIELD: &'static str = "Task_ID";

    fn id(&self) -> Option<RecordId> {
        self.comment_id
    }
}

/// Time interval a user spent on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimeTrack {
    /// Server-assigned id.
    #[serde(rename = "Time_ID", default)]
    pub time_id: Option<RecordId>,
    /// Task the time was spent on.
    #[serde(rename = "Task_ID")]
    pub task_id: RecordId,
    /// User who tracked the time.
    #[serde(rename = "User_ID")]
    pub user_id: RecordId,
    /// Interval start.
    #[serde(rename = "Time_Start")]
    pub started_at: DateTime<Utc>,
    /// Interval end; absent while the timer is still running.
    #[serde(rename = "Time_End", default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl TaskTimeTrack {
    /// Returns the tracked duration, `None` while the timer runs.
    ///
    /// Entries whose end precedes their start count as zero.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        self.ended_at
            .map(|ended_at| (ended_at - self.started_at).max(TimeDelta::zero()))
    }
}

impl Resource for TaskTimeTrack {
    const RESOURCE: &'static str = "timetracks";
    const ID_FIELD: &'static str = "Time_ID";
    const PARENT: &'static str = "tasks";
    const PARENT_ID_FIELD: &'static str = "Task_ID";

    fn id(&self) -> Option<RecordId> {
        self.time_id
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};
    use teamtrack_core::RecordId;

    use super::TaskTimeTrack;

    fn track(start_hour: u32, end_hour: Option<u32>) -> TaskTimeTrack {
        let at = |hour| Utc.with_ymd_and_hms(2026, 10, 1, hour, 0, 0).single();
        TaskTimeTrack {
            time_id: Some(RecordId::new(1)),
            task_id: RecordId::new(2),
            user_id: RecordId::new(3),
            started_at: at(start_hour).unwrap_or_default(),
            ended_at: end_hour.and_then(at),
        }
    }

    #[test]
    fn closed_track_reports_its_duration() {
        assert_eq!(track(9, Some(11)).duration(), Some(TimeDelta::hours(2)));
    }

    #[test]
    fn running_track_has_no_duration() {
        assert_eq!(track(9, None).duration(), None);
    }

    #[test]
    fn inverted_track_counts_as_zero() {
        assert_eq!(track(11, Some(9)).duration(), Some(TimeDelta::zero()));
    }
}
