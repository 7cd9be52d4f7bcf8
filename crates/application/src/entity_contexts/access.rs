use super::*;

impl ResourceContexts {
    /// Reads an organisation's owner without touching the organisation cache.
    pub async fn organisation_owner(
        &self,
        organisation_id: RecordId,
    ) -> AppResult<Option<RecordId>> {
        let slot = self
            .organisations
            .read_item_by_id(organisation_id, true)
            .await?;

        Ok(slot
            .into_loaded()
            .map(|organisation| organisation.owner_user_id))
    }

    /// Resolves the signed-in user's rights on a record of an organisation.
    pub async fn resource_access(
        &self,
        store: &SessionStore,
        organisation_id: RecordId,
        resource: Option<ResourceRef>,
    ) -> AppResult<ResourceAccess> {
        let session = store.session_context().await?;
        let owner_user_id = self.organisation_owner(organisation_id).await?;

        Ok(resolve_access(&session, owner_user_id, resource))
    }
}
