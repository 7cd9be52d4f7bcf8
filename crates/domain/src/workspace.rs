//! Organisation hierarchy records: organisations own teams, teams own
//! projects, projects own backlogs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use teamtrack_core::RecordId;

use crate::Resource;

/// Top-level tenant owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    /// Server-assigned id.
    #[serde(rename = "Organisation_ID", default)]
    pub organisation_id: Option<RecordId>,
    /// Owning user; ownership overrides every permission check.
    #[serde(rename = "User_ID")]
    pub owner_user_id: RecordId,
    /// Display name.
    #[serde(rename = "Organisation_Name")]
    pub name: String,
    /// Optional free-text description.
    #[serde(rename = "Organisation_Description", default)]
    pub description: Option<String>,
}

impl Resource for Organisation {
    const RESOURCE: &'static str = "organisations";
    const ID_FIELD: &'static str = "Organisation_ID";
    const PARENT: &'static str = "users";
    const PARENT_ID_FIELD: &'static str = "User_ID";

    fn id(&self) -> Option<RecordId> {
        self.organisation_id
    }
}

/// Team inside an organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Server-assigned id.
    #[serde(rename = "Team_ID", default)]
    pub team_id: Option<RecordId>,
    /// Parent organisation.
    #[serde(rename = "Organisation_ID")]
    pub organisation_id: RecordId,
    /// Display name.
    #[serde(rename = "Team_Name")]
    pub name: String,
}

impl Resource for Team {
    const RESOURCE: &'static str = "teams";
    const ID_FIELD: &'static str = "Team_ID";
    const PARENT: &'static str = "organisations";
    const PARENT_ID_FIELD: &'static str = "Organisation_ID";

    fn id(&self) -> Option<RecordId> {
        self.team_id
    }
}

/// Project run by a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned id.
    #[serde(rename = "Project_ID", default)]
    pub project_id: Option<RecordId>,
    /// Parent team.
    #[serde(rename = "Team_ID")]
    pub team_id: RecordId,
    /// Display name.
    #[serde(rename = "Project_Name")]
    pub name: String,
    /// Short key used as a task prefix.
    #[serde(rename = "Project_Key", default)]
    pub key: Option<String>,
    /// Optional free-text description.
    #[serde(rename = "Project_Description", default)]
    pub description: Option<String>,
}

impl Resource for Project {
    const RESOURCE: &'static str = "projects";
    const ID_FIELD: &'static str = "Project_ID";
    const PARENT: &'static str = "teams";
    const PARENT_ID_FIELD: &'static str = "Team_ID";

    fn id(&self) -> Option<RecordId> {
        self.project_id
    }
}

/// Ordered list of tasks inside a project, e.g. a sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlog {
    /// Server-assigned id.
    #[serde(rename = "Backlog_ID", default)]
    pub backlog_id: Option<RecordId>,
    /// Parent project.
    #[serde(rename = "Project_ID")]
    pub project_id: RecordId,
    /// Display name.
    #[serde(rename = "Backlog_Name")]
    pub name: String,
    /// Whether this is the project's default backlog.
    #[serde(rename = "Backlog_IsPrimary", default)]
    pub is_primary: bool,
    /// Optional planned start date.
    #[serde(rename = "Backlog_StartDate", default)]
    pub start_date: Option<NaiveDate>,
    /// Optional planned end date.
    #[serde(rename = "Backlog_EndDate", default)]
    pub end_date: Option<NaiveDate>,
}

impl Resource for Backlog {
    const RESOURCE: &'static str = "backlogs";
    const ID_FIELD: &'static str = "Backlog_ID";
    const PARENT: &'static str = "projects";
    const PARENT_ID_FIELD: &'static str = "Project_ID";

    fn id(&self) -> Option<RecordId> {
        self.backlog_id
    }
}
