use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use teamtrack_core::{AppError, AppResult, NonEmptyString, RecordId};

/// Capability level encoded in a scoped permission key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionLevel {
    /// Read access to the resource.
    Access,
    /// Full control; implies access.
    Manage,
}

impl PermissionLevel {
    /// Returns the key prefix for this level.
    #[must_use]
    pub fn as_prefix(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Manage => "manage",
        }
    }

    /// Returns all levels.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionLevel] = &[PermissionLevel::Access, PermissionLevel::Manage];

        ALL
    }
}

/// Resource types that can carry per-record permission keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A project.
    Project,
    /// A backlog.
    Backlog,
}

impl ResourceKind {
    /// Returns the type name used inside permission keys.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Backlog => "Backlog",
        }
    }

    /// Returns all kinds.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ResourceKind] = &[ResourceKind::Project, ResourceKind::Backlog];

        ALL
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "backlog" => Ok(Self::Backlog),
            _ => Err(AppError::Validation(format!(
                "unknown resource kind '{value}'"
            ))),
        }
    }
}

/// Flat permission key as stored on the server.
///
/// Scoped keys follow `<level><Kind>.<id>` (`accessBacklog.42`,
/// `manageProject.7`); anything else is a bare capability name such as
/// `Manage Team Members`. Keys compare by exact text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Creates a key from user input, rejecting blank values.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value).map(|value| Self(value.into()))
    }

    /// Builds the key granting `level` on one record.
    #[must_use]
    pub fn scoped(level: PermissionLevel, kind: ResourceKind, id: RecordId) -> Self {
        Self(format!("{}{}.{id}", level.as_prefix(), kind.as_str()))
    }

    /// Builds a bare capability key.
    #[must_use]
    pub fn capability(name: NonEmptyString) -> Self {
        Self(name.into())
    }

    /// Returns the stored key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Classifies the key when it follows the scoped scheme.
    #[must_use]
    pub fn scope(&self) -> Option<(PermissionLevel, ResourceKind, RecordId)> {
        PermissionLevel::all().iter().find_map(|level| {
            let rest = self.0.strip_prefix(level.as_prefix())?;
            ResourceKind::all().iter().find_map(|kind| {
                let digits = rest.strip_prefix(kind.as_str())?.strip_prefix('.')?;
                if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
                    return None;
                }
                digits
                    .parse::<u64>()
                    .ok()
                    .map(|id| (*level, *kind, RecordId::new(id)))
            })
        })
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionKey> for String {
    fn from(key: PermissionKey) -> Self {
        key.0
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Editable permission list of a role.
///
/// The mutators keep scoped keys paired: granting manage also grants access,
/// revoking access also revokes manage. Lists read from the server are kept
/// in order; a `null` list reads as empty and blank keys are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionGrants(Vec<PermissionKey>);

impl<'de> Deserialize<'de> for PermissionGrants {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keys = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();

        Ok(Self(
            keys.into_iter()
                .filter_map(|key| PermissionKey::new(key).ok())
                .collect(),
        ))
    }
}

impl PermissionGrants {
    /// Creates an empty grant list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> &[PermissionKey] {
        self.0.as_slice()
    }

    /// Returns whether the exact key is present.
    #[must_use]
    pub fn contains(&self, key: &PermissionKey) -> bool {
        self.0.contains(key)
    }

    /// Returns the highest level held on a record.
    #[must_use]
    pub fn level_for(&self, kind: ResourceKind, id: RecordId) -> Option<PermissionLevel> {
        if self.contains(&PermissionKey::scoped(PermissionLevel::Manage, kind, id)) {
            Some(PermissionLevel::Manage)
        } else if self.contains(&PermissionKey::scoped(PermissionLevel::Access, kind, id)) {
            Some(PermissionLevel::Access)
        } else {
            None
        }
    }

    /// Toggles access on a record; revoking access also revokes manage.
    pub fn set_access(&mut self, kind: ResourceKind, id: RecordId, enabled: bool) {
        let access = PermissionKey::scoped(PermissionLevel::Access, kind, id);
        if enabled {
            self.insert(access);
        } else {
            self.remove(&access);
            self.remove(&PermissionKey::scoped(PermissionLevel::Manage, kind, id));
        }
    }

    /// Toggles manage on a record; granting manage also grants access.
    pub fn set_manage(&mut self, kind: ResourceKind, id: RecordId, enabled: bool) {
        let manage = PermissionKey::scoped(PermissionLevel::Manage, kind, id);
        if enabled {
            self.insert(PermissionKey::scoped(PermissionLevel::Access, kind, id));
            self.insert(manage);
        } else {
            self.remove(&manage);
        }
    }

    /// Toggles an arbitrary key, routing scoped keys through the paired
    /// toggles.
    pub fn set_key(&mut self, key: PermissionKey, enabled: bool) {
        match key.scope() {
            Some((PermissionLevel::Access, kind, id)) => self.set_access(kind, id, enabled),
            Some((PermissionLevel::Manage, kind, id)) => self.set_manage(kind, id, enabled),
            None if enabled => self.insert(key),
            None => self.remove(&key),
        }
    }

    fn insert(&mut self, key: PermissionKey) {
        if !self.0.contains(&key) {
            self.0.push(key);
        }
    }

    fn remove(&mut self, key: &PermissionKey) {
        self.0.retain(|value| value != key);
    }
}

impl From<Vec<PermissionKey>> for PermissionGrants {
    fn from(keys: Vec<PermissionKey>) -> Self {
        Self(keys)
    }
}
