use serde::Serialize;
use serde::de::DeserializeOwned;
use teamtrack_core::RecordId;

/// Describes how a record type is addressed on the remote API.
///
/// Every entity collection is scoped to exactly one parent collection. The
/// constants are the only entity-specific knowledge the generic resource
/// layer is allowed to use.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Collection path segment, e.g. `backlogs`.
    const RESOURCE: &'static str;
    /// Wire name of the identifier field, e.g. `Backlog_ID`.
    const ID_FIELD: &'static str;
    /// Parent collection path segment, e.g. `projects`.
    const PARENT: &'static str;
    /// Wire name of the field linking a record to its parent.
    const PARENT_ID_FIELD: &'static str;

    /// Returns the server-assigned id, absent for unsaved drafts.
    fn id(&self) -> Option<RecordId>;
}

/// `GET` path listing every record under one parent.
#[must_use]
pub fn list_path<T: Resource>(parent_id: RecordId) -> String {
    format!("{}/{parent_id}/{}", T::PARENT, T::RESOURCE)
}

/// Path addressing a single record.
#[must_use]
pub fn item_path<T: Resource>(item_id: RecordId) -> String {
    format!("{}/{item_id}", T::RESOURCE)
}

/// `POST` path for creating a record.
#[must_use]
pub fn collection_path<T: Resource>() -> String {
    T::RESOURCE.to_owned()
}
