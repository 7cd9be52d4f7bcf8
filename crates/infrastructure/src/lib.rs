//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_resource_transport;
mod in_memory_resource_transport;
mod prompt_delete_confirmation;

pub use http_resource_transport::HttpResourceTransport;
pub use in_memory_resource_transport::InMemoryResourceTransport;
pub use prompt_delete_confirmation::{FixedDeleteConfirmation, PromptDeleteConfirmation};
