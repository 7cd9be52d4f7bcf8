//! Team membership: users, seats and roles.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use teamtrack_core::{AppError, AppResult, RecordId};

use crate::{PermissionGrants, Resource};

/// Registered user as listed inside a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id.
    #[serde(rename = "User_ID", default)]
    pub user_id: Option<RecordId>,
    /// Team through which the user was listed.
    #[serde(rename = "Team_ID", default)]
    pub team_id: Option<RecordId>,
    /// Login email.
    #[serde(rename = "User_Email")]
    pub email: String,
    /// Given name.
    #[serde(rename = "User_FirstName", default)]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "User_Surname", default)]
    pub surname: String,
}

impl User {
    /// Returns `first surname`, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.surname.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_owned()
        }
    }
}

impl Resource for User {
    const RESOURCE: &'static str = "users";
    const ID_FIELD: &'static str = "User_ID";
    const PARENT: &'static str = "teams";
    const PARENT_ID_FIELD: &'static str = "Team_ID";

    fn id(&self) -> Option<RecordId> {
        self.user_id
    }
}

/// Membership state of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatStatus {
    /// Approved member; the only state that carries permissions.
    Active,
    /// Suspended member.
    Inactive,
    /// Invited, awaiting approval.
    Pending,
}

impl SeatStatus {
    /// Returns the wire value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
        }
    }
}

impl Display for SeatStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SeatStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            "Pending" => Ok(Self::Pending),
            _ => Err(AppError::Validation(format!(
                "unknown seat status '{value}'"
            ))),
        }
    }
}

/// Links a user to a team with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUserSeat {
    /// Server-assigned id.
    #[serde(rename = "Seat_ID", default)]
    pub seat_id: Option<RecordId>,
    /// Team the seat belongs to.
    #[serde(rename = "Team_ID")]
    pub team_id: RecordId,
    /// Seated user.
    #[serde(rename = "User_ID")]
    pub user_id: RecordId,
    /// Role granting the seat its permissions.
    #[serde(rename = "Role_ID", default)]
    pub role_id: Option<RecordId>,
    /// Membership state.
    #[serde(rename = "Seat_Status")]
    pub status: SeatStatus,
}

impl TeamUserSeat {
    /// Creates an unsaved seat for an invited user.
    #[must_use]
    pub fn invite(team_id: RecordId, user_id: RecordId, role_id: Option<RecordId>) -> Self {
        Self {
            seat_id: None,
            team_id,
            user_id,
            role_id,
            status: SeatStatus::Pending,
        }
    }

    /// Moves a pending invite to active.
    pub fn approve(&mut self) -> AppResult<()> {
        self.transition(SeatStatus::Pending, SeatStatus::Active)
    }

    /// Suspends an active seat.
    pub fn deactivate(&mut self) -> AppResult<()> {
        self.transition(SeatStatus::Active, SeatStatus::Inactive)
    }

    /// Restores a suspended seat.
    pub fn reactivate(&mut self) -> AppResult<()> {
        self.transition(SeatStatus::Inactive, SeatStatus::Active)
    }

    /// Returns whether the seat currently grants its role's permissions.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SeatStatus::Active
    }

    fn transition(&mut self, from: SeatStatus, to: SeatStatus) -> AppResult<()> {
        if self.status != from {
            return Err(AppError::Conflict(format!(
                "seat for user '{}' in team '{}' is {} and cannot become {}",
                self.user_id, self.team_id, self.status, to
            )));
        }

        self.status = to;
        Ok(())
    }
}

impl Resource for TeamUserSeat {
    const RESOURCE: &'static str = "seats";
    const ID_FIELD: &'static str = "Seat_ID";
    const PARENT: &'static str = "teams";
    const PARENT_ID_FIELD: &'static str = "Team_ID";

    fn id(&self) -> Option<RecordId> {
        self.seat_id
    }
}

/// Named permission bundle defined per team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Server-assigned id.
    #[serde(rename = "Role_ID", default)]
    pub role_id: Option<RecordId>,
    /// Team the role is scoped to.
    #[serde(rename = "Team_ID")]
    pub team_id: RecordId,
    /// Display name.
    #[serde(rename = "Role_Name")]
    pub name: String,
    /// Flat permission keys granted by the role.
    #[serde(rename = "Role_Permissions", default)]
    pub permissions: PermissionGrants,
}

impl Resource for Role {
    const RESOURCE: &'static str = "roles";
    const ID_FIELD: &'static str = "Role_ID";
    const PARENT: &'static str = "teams";
    const PARENT_ID_FIELD: &'static str = "Team_ID";

    fn id(&self) -> Option<RecordId> {
        self.role_id
    }
}
