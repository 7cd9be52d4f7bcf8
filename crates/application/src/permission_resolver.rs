use teamtrack_core::{CurrentUser, RecordId};
use teamtrack_domain::{PermissionKey, PermissionLevel, ResourceKind};

/// Caller identity and seat permissions handed to every permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user: CurrentUser,
    permissions: Vec<PermissionKey>,
}

impl SessionContext {
    /// Creates a session context.
    #[must_use]
    pub fn new(user: CurrentUser, permissions: Vec<PermissionKey>) -> Self {
        Self { user, permissions }
    }

    /// Returns the signed-in user.
    #[must_use]
    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    /// Returns the seat permission keys.
    #[must_use]
    pub fn permissions(&self) -> &[PermissionKey] {
        self.permissions.as_slice()
    }

    fn holds(&self, key: &PermissionKey) -> bool {
        self.permissions.iter().any(|value| value == key)
    }

    fn owns(&self, owner_user_id: Option<RecordId>) -> bool {
        owner_user_id == Some(self.user.user_id())
    }
}

/// Record targeted by a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    /// Record type.
    pub kind: ResourceKind,
    /// Record id.
    pub id: RecordId,
}

impl ResourceRef {
    /// Creates a resource reference.
    #[must_use]
    pub fn new(kind: ResourceKind, id: RecordId) -> Self {
        Self { kind, id }
    }
}

/// Capabilities resolved for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceAccess {
    /// The record may be viewed.
    pub can_access: bool,
    /// The record may be edited and deleted.
    pub can_manage: bool,
}

impl ResourceAccess {
    /// Full rights.
    pub const FULL: Self = Self {
        can_access: true,
        can_manage: true,
    };

    /// No rights.
    pub const DENIED: Self = Self {
        can_access: false,
        can_manage: false,
    };
}

/// Resolves access to a record for the session user.
///
/// The organisation owner gets full rights unconditionally. Otherwise
/// `manage<Type>.<id>` grants both rights, `access<Type>.<id>` grants access
/// only, and anything else is denied.
#[must_use]
pub fn resolve_access(
    session: &SessionContext,
    owner_user_id: Option<RecordId>,
    resource: Option<ResourceRef>,
) -> ResourceAccess {
    if session.owns(owner_user_id) {
        return ResourceAccess::FULL;
    }

    let Some(resource) = resource else {
        return ResourceAccess::DENIED;
    };

    let can_manage = session.holds(&PermissionKey::scoped(
        PermissionLevel::Manage,
        resource.kind,
        resource.id,
    ));
    let can_access = can_manage
        || session.holds(&PermissionKey::scoped(
            PermissionLevel::Access,
            resource.kind,
            resource.id,
        ));

    ResourceAccess {
        can_access,
        can_manage,
    }
}

/// Returns whether the session user holds a bare capability such as
/// `Manage Team Members`. Owners hold every capability.
#[must_use]
pub fn has_capability(
    session: &SessionContext,
    owner_user_id: Option<RecordId>,
    capability: &str,
) -> bool {
    session.owns(owner_user_id)
        || session
            .permissions
            .iter()
            .any(|value| value.as_str() == capability)
}
