use super::*;

impl<T: Resource> ResourceContext<T> {
    /// Fetches every record under `parent_id`.
    ///
    /// Returns `None` when the request or its payload fails; the failure is
    /// logged and the cache is left as it was (apart from a `refresh` clear).
    /// Concurrent reads are not de-duplicated: the response that resolves
    /// last overwrites the list.
    pub async fn read_items_by_id(&self, parent_id: RecordId, options: ListRead) -> Option<Vec<T>> {
        if options.refresh {
            self.state.write().await.items_by_id.clear();
        }

        let path = list_path::<T>(parent_id);
        let reply = match into_reply(self.transport.get(path.as_str()).await) {
            Ok(reply) => reply,
            Err(error) => {
                warn!(
                    resource = T::RESOURCE,
                    parent_id = %parent_id,
                    error = %error,
                    "failed to read resource list"
                );
                return None;
            }
        };

        if let Some(message) = reply_failure_message(&reply) {
            warn!(
                resource = T::RESOURCE,
                parent_id = %parent_id,
                reason = message,
                "server reported failure while reading resource list"
            );
            return None;
        }

        let items = match serde_json::from_value::<Vec<T>>(reply) {
            Ok(items) => items,
            Err(error) => {
                warn!(
                    resource = T::RESOURCE,
                    parent_id = %parent_id,
                    error = %error,
                    "failed to decode resource list"
                );
                return None;
            }
        };

        if !options.reply {
            self.state.write().await.items_by_id = items.clone();
        }

        Some(items)
    }

    /// Fetches a single record.
    ///
    /// A success writes [`ItemSlot::Loaded`]; a bad-request rejection writes
    /// [`ItemSlot::NotFound`]. Every other failure is returned as an error and
    /// leaves the slot untouched. With `reply` set, nothing is written.
    pub async fn read_item_by_id(&self, item_id: RecordId, reply: bool) -> AppResult<ItemSlot<T>> {
        let path = item_path::<T>(item_id);
        let slot = match into_reply(self.transport.get(path.as_str()).await) {
            Ok(body) => {
                if let Some(message) = reply_failure_message(&body) {
                    warn!(
                        resource = T::RESOURCE,
                        item_id = %item_id,
                        reason = message,
                        "server reported failure while reading resource"
                    );
                    return Err(AppError::Transport(message.to_owned()));
                }

                let item = serde_json::from_value::<T>(body).map_err(|error| {
                    AppError::Internal(format!(
                        "failed to decode {} '{item_id}': {error}",
                        T::RESOURCE
                    ))
                })?;
                ItemSlot::Loaded(item)
            }
            Err(error) if error.is_bad_request() => {
                debug!(
                    resource = T::RESOURCE,
                    item_id = %item_id,
                    error = %error,
                    "server rejected resource id"
                );
                ItemSlot::NotFound
            }
            Err(error) => return Err(error.into()),
        };

        if !reply {
            self.state.write().await.item_by_id = slot.clone();
        }

        Ok(slot)
    }
}
