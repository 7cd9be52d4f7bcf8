use serde_json::{Map, Value};

/// Single-item cache cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSlot<T> {
    /// No read has completed yet.
    NotLoaded,
    /// The last read returned this record.
    Loaded(T),
    /// The server rejected the id.
    NotFound,
}

impl<T> ItemSlot<T> {
    /// Returns the loaded record, if any.
    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(item) => Some(item),
            Self::NotLoaded | Self::NotFound => None,
        }
    }

    /// Consumes the slot and returns the loaded record, if any.
    #[must_use]
    pub fn into_loaded(self) -> Option<T> {
        match self {
            Self::Loaded(item) => Some(item),
            Self::NotLoaded | Self::NotFound => None,
        }
    }

    /// Returns whether the server confirmed the record is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl<T> Default for ItemSlot<T> {
    fn default() -> Self {
        Self::NotLoaded
    }
}

/// Record under construction, accumulated field by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft(Map<String, Value>);

impl Draft {
    /// Returns the draft fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns one draft field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns whether no field has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn set(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_owned(), value);
    }

    pub(crate) fn merge(&mut self, object: Map<String, Value>) {
        self.0.extend(object);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

/// Options for a parent-scoped list read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListRead {
    /// Empties the cached list before issuing the request.
    pub refresh: bool,
    /// Returns the fetched list without writing it to the cache.
    pub reply: bool,
}

impl ListRead {
    /// Fetches and stores the list.
    #[must_use]
    pub fn store() -> Self {
        Self::default()
    }

    /// Clears the cached list, then fetches and stores it.
    #[must_use]
    pub fn refresh() -> Self {
        Self {
            refresh: true,
            reply: false,
        }
    }

    /// Fetches the list for the caller only.
    #[must_use]
    pub fn reply() -> Self {
        Self {
            refresh: false,
            reply: true,
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    /// The delete request was sent and the parent list re-fetched.
    Removed {
        /// Whether the server reply looked successful.
        confirmed: bool,
        /// Navigation target handed back to the caller.
        redirect: Option<String>,
    },
}

/// Cache owned by one resource context.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Children of the parent fetched last.
    pub items_by_id: Vec<T>,
    /// Single-item read result.
    pub item_by_id: ItemSlot<T>,
    /// Create draft.
    pub new_item: Draft,
    /// Record focused by the caller.
    pub item_detail: Option<T>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items_by_id: Vec::new(),
            item_by_id: ItemSlot::default(),
            new_item: Draft::default(),
            item_detail: None,
        }
    }
}
