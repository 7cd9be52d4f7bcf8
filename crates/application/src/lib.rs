//! Application services and ports.

#![forbid(unsafe_code)]

mod entity_contexts;
mod permission_resolver;
mod resource_context;
mod resource_ports;
mod session_store;

pub use entity_contexts::{BacklogTaskStats, ResourceContexts};
pub use permission_resolver::{
    ResourceAccess, ResourceRef, SessionContext, has_capability, resolve_access,
};
pub use resource_context::{
    Draft, ItemSlot, ListRead, RemoveOutcome, ResourceContext, ResourceState,
};
pub use resource_ports::{
    DeleteConfirmation, ResourceTransport, TransportError, TransportErrorKind,
    is_success_reply, reply_failure_message,
};
pub use session_store::{SessionStore, StatusLevel, StatusMessage};
