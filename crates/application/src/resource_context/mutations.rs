use super::*;

impl<T: Resource> ResourceContext<T> {
    /// Updates the create draft.
    ///
    /// With `object` set, its fields are merged over the draft and `field`
    /// is ignored; otherwise `field` is set to `value`.
    pub async fn handle_change_new_item(
        &self,
        field: &str,
        value: Value,
        object: Option<Map<String, Value>>,
    ) {
        let mut state = self.state.write().await;
        match object {
            Some(object) => state.new_item.merge(object),
            None => state.new_item.set(field, value),
        }
    }

    /// Creates `object`, or the draft when `object` is `None`.
    ///
    /// On success the list under `parent_id` is re-fetched and the draft is
    /// cleared. On failure nothing changes and `false` is returned.
    pub async fn add_item(&self, parent_id: RecordId, object: Option<T>) -> bool {
        let mut body = match object {
            Some(object) => match record_body(&object) {
                Ok(body) => body,
                Err(error) => {
                    warn!(
                        resource = T::RESOURCE,
                        error = %error,
                        "failed to build create body"
                    );
                    return false;
                }
            },
            None => self.state.read().await.new_item.fields().clone(),
        };
        body.remove(T::ID_FIELD);

        let path = collection_path::<T>();
        match into_reply(self.transport.post(path.as_str(), Value::Object(body)).await) {
            Ok(reply) if is_success_reply(&reply) => {}
            Ok(reply) => {
                warn!(
                    resource = T::RESOURCE,
                    parent_id = %parent_id,
                    reason = reply_failure_message(&reply).unwrap_or("empty reply"),
                    "server rejected resource create"
                );
                return false;
            }
            Err(error) => {
                warn!(
                    resource = T::RESOURCE,
                    parent_id = %parent_id,
                    error = %error,
                    "failed to create resource"
                );
                return false;
            }
        }

        debug!(resource = T::RESOURCE, parent_id = %parent_id, "resource created");
        self.read_items_by_id(parent_id, ListRead::store()).await;
        self.state.write().await.new_item.clear();
        true
    }

    /// Updates an existing record by its id, then re-fetches the list under
    /// `parent_id`. Returns whether the server accepted the update.
    pub async fn save_item_changes(&self, item_changes: &T, parent_id: RecordId) -> bool {
        let Some(item_id) = item_changes.id() else {
            warn!(
                resource = T::RESOURCE,
                id_field = T::ID_FIELD,
                "cannot update a record without an id"
            );
            return false;
        };

        let body = match record_body(item_changes) {
            Ok(body) => body,
            Err(error) => {
                warn!(
                    resource = T::RESOURCE,
                    item_id = %item_id,
                    error = %error,
                    "failed to build update body"
                );
                return false;
            }
        };

        let path = item_path::<T>(item_id);
        match into_reply(self.transport.put(path.as_str(), Value::Object(body)).await) {
            Ok(reply) => {
                if let Some(message) = reply_failure_message(&reply) {
                    warn!(
                        resource = T::RESOURCE,
                        item_id = %item_id,
                        reason = message,
                        "server rejected resource update"
                    );
                    return false;
                }
            }
            Err(error) => {
                warn!(
                    resource = T::RESOURCE,
                    item_id = %item_id,
                    error = %error,
                    "failed to update resource"
                );
                return false;
            }
        }

        debug!(resource = T::RESOURCE, item_id = %item_id, "resource updated");
        self.read_items_by_id(parent_id, ListRead::store()).await;
        true
    }

    /// Deletes a record after the user confirms.
    ///
    /// Once the request is sent, the list under `parent_id` is re-fetched
    /// whatever the reply was. `redirect` is handed back untouched.
    pub async fn remove_item(
        &self,
        item_id: RecordId,
        parent_id: RecordId,
        redirect: Option<String>,
    ) -> RemoveOutcome {
        if !self.confirmation.confirm_delete(T::RESOURCE, item_id).await {
            debug!(resource = T::RESOURCE, item_id = %item_id, "delete cancelled");
            return RemoveOutcome::Cancelled;
        }

        let path = item_path::<T>(item_id);
        let confirmed = match into_reply(self.transport.delete(path.as_str()).await) {
            Ok(reply) => is_success_reply(&reply),
            Err(error) => {
                warn!(
                    resource = T::RESOURCE,
                    item_id = %item_id,
                    error = %error,
                    "failed to delete resource"
                );
                false
            }
        };

        self.read_items_by_id(parent_id, ListRead::store()).await;
        RemoveOutcome::Removed {
            confirmed,
            redirect,
        }
    }
}
