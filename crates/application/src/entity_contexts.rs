use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::TimeDelta;
use serde::Serialize;
use teamtrack_core::{AppError, AppResult, RecordId};
use teamtrack_domain::{
    Backlog, Organisation, PermissionKey, PermissionLevel, Project, Role, Task, TaskComment,
    TaskTimeTrack, Team, TeamUserSeat, User,
};
use tracing::{debug, info, warn};

use crate::permission_resolver::{ResourceAccess, ResourceRef, resolve_access};
use crate::resource_context::{ItemSlot, ListRead, ResourceContext};
use crate::resource_ports::{DeleteConfirmation, ResourceTransport};
use crate::session_store::SessionStore;

mod access;
mod roles;
mod seats;
mod stats;

pub use stats::BacklogTaskStats;

/// One resource context per entity type, all sharing a transport.
///
/// Entity-specific behaviour lives in the helpers on this type; the contexts
/// themselves are uniform.
#[derive(Clone)]
pub struct ResourceContexts {
    /// Organisations owned by a user.
    pub organisations: ResourceContext<Organisation>,
    /// Teams of an organisation.
    pub teams: ResourceContext<Team>,
    /// Projects of a team.
    pub projects: ResourceContext<Project>,
    /// Backlogs of a project.
    pub backlogs: ResourceContext<Backlog>,
    /// Tasks of a backlog.
    pub tasks: ResourceContext<Task>,
    /// Comments on a task.
    pub comments: ResourceContext<TaskComment>,
    /// Time tracked on a task.
    pub time_tracks: ResourceContext<TaskTimeTrack>,
    /// Seats of a team.
    pub seats: ResourceContext<TeamUserSeat>,
    /// Roles of a team.
    pub roles: ResourceContext<Role>,
    /// Users listed in a team.
    pub users: ResourceContext<User>,
}

impl ResourceContexts {
    /// Builds every context from one transport and one delete prompt.
    #[must_use]
    pub fn new(
        transport: Arc<dyn ResourceTransport>,
        confirmation: Arc<dyn DeleteConfirmation>,
    ) -> Self {
        Self {
            organisations: ResourceContext::new(transport.clone(), confirmation.clone()),
            teams: ResourceContext::new(transport.clone(), confirmation.clone()),
            projects: ResourceContext::new(transport.clone(), confirmation.clone()),
            backlogs: ResourceContext::new(transport.clone(), confirmation.clone()),
            tasks: ResourceContext::new(transport.clone(), confirmation.clone()),
            comments: ResourceContext::new(transport.clone(), confirmation.clone()),
            time_tracks: ResourceContext::new(transport.clone(), confirmation.clone()),
            seats: ResourceContext::new(transport.clone(), confirmation.clone()),
            roles: ResourceContext::new(transport.clone(), confirmation.clone()),
            users: ResourceContext::new(transport, confirmation),
        }
    }
}

#[cfg(test)]
mod tests;
