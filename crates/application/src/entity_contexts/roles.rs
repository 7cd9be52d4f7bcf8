use super::*;

impl ResourceContexts {
    /// Toggles one key on a role and saves it.
    ///
    /// Scoped keys go through the paired toggles, so enabling
    /// `manageBacklog.3` also enables `accessBacklog.3` and disabling the
    /// access key also drops the manage key.
    pub async fn toggle_role_permission(
        &self,
        role: &Role,
        key: PermissionKey,
        enabled: bool,
    ) -> bool {
        let mut changed = role.clone();
        changed.permissions.set_key(key, enabled);
        self.save_role(role, changed).await
    }

    /// Toggles a level on one record for a role and saves it.
    pub async fn set_role_level(
        &self,
        role: &Role,
        resource: ResourceRef,
        level: PermissionLevel,
        enabled: bool,
    ) -> bool {
        let mut changed = role.clone();
        match level {
            PermissionLevel::Access => {
                changed
                    .permissions
                    .set_access(resource.kind, resource.id, enabled);
            }
            PermissionLevel::Manage => {
                changed
                    .permissions
                    .set_manage(resource.kind, resource.id, enabled);
            }
        }
        self.save_role(role, changed).await
    }

    async fn save_role(&self, original: &Role, changed: Role) -> bool {
        if changed.permissions == original.permissions {
            return true;
        }

        self.roles
            .save_item_changes(&changed, original.team_id)
            .await
    }
}
