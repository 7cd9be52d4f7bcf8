//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod membership;
mod resource;
mod security;
mod task;
mod workspace;

pub use membership::{Role, SeatStatus, TeamUserSeat, User};
pub use resource::{Resource, collection_path, item_path, list_path};
pub use security::{PermissionGrants, PermissionKey, PermissionLevel, ResourceKind};
pub use task::{Task, TaskComment, TaskTimeTrack};
pub use workspace::{Backlog, Organisation, Project, Team};
