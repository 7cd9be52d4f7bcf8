use std::sync::Arc;

use serde_json::{Map, Value};
use teamtrack_core::{AppError, AppResult, RecordId};
use teamtrack_domain::{Resource, collection_path, item_path, list_path};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::resource_ports::{
    DeleteConfirmation, ResourceTransport, TransportError, is_success_reply,
    reply_failure_message,
};

mod mutations;
mod reads;
mod state;

pub use state::{Draft, ItemSlot, ListRead, RemoveOutcome, ResourceState};

/// Parent-scoped CRUD access for one entity type with a local cache.
///
/// Clones share the same cache, so every holder of a context observes writes
/// made through any other holder. The list slot holds the children of
/// whichever parent was fetched last; every successful mutation re-fetches
/// that list instead of patching it.
pub struct ResourceContext<T: Resource> {
    transport: Arc<dyn ResourceTransport>,
    confirmation: Arc<dyn DeleteConfirmation>,
    state: Arc<RwLock<ResourceState<T>>>,
}

impl<T: Resource> Clone for ResourceContext<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            confirmation: Arc::clone(&self.confirmation),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Resource> ResourceContext<T> {
    /// Creates a context with an empty cache.
    #[must_use]
    pub fn new(
        transport: Arc<dyn ResourceTransport>,
        confirmation: Arc<dyn DeleteConfirmation>,
    ) -> Self {
        Self {
            transport,
            confirmation,
            state: Arc::new(RwLock::new(ResourceState::default())),
        }
    }

    /// Returns the cached parent-scoped list.
    pub async fn items_by_id(&self) -> Vec<T> {
        self.state.read().await.items_by_id.clone()
    }

    /// Returns the single-item slot.
    pub async fn item_by_id(&self) -> ItemSlot<T> {
        self.state.read().await.item_by_id.clone()
    }

    /// Returns the create draft.
    pub async fn new_item(&self) -> Draft {
        self.state.read().await.new_item.clone()
    }

    /// Returns the focused record.
    pub async fn item_detail(&self) -> Option<T> {
        self.state.read().await.item_detail.clone()
    }

    /// Replaces the focused record.
    pub async fn set_item_detail(&self, item: Option<T>) {
        self.state.write().await.item_detail = item;
    }

    /// Returns a copy of the whole cache.
    pub async fn snapshot(&self) -> ResourceState<T> {
        self.state.read().await.clone()
    }
}

fn record_body<T: Resource>(record: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(AppError::Internal(format!(
            "{} record did not serialize to an object",
            T::RESOURCE
        ))),
        Err(error) => Err(AppError::Internal(format!(
            "failed to serialize {} record: {error}",
            T::RESOURCE
        ))),
    }
}

fn into_reply(result: Result<Value, TransportError>) -> Result<Value, TransportError> {
    match result {
        Ok(reply) => match TransportError::from_reply(&reply) {
            Some(error) => Err(error),
            None => Ok(reply),
        },
        Err(error) => Err(error),
    }
}
