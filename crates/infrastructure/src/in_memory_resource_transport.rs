use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use teamtrack_application::{ResourceTransport, TransportError};
use teamtrack_core::{AppError, AppResult};
use teamtrack_domain::Resource;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
struct CollectionShape {
    parent: &'static str,
    id_field: &'static str,
    parent_id_field: &'static str,
}

#[derive(Debug, Default)]
struct Collections {
    records: HashMap<&'static str, Vec<Map<String, Value>>>,
    next_id: u64,
}

/// Transport serving the REST path scheme from records held in memory.
///
/// Collections must be registered before use; requests for unknown
/// collections or ids fail with a 404 like the real API.
#[derive(Debug, Default)]
pub struct InMemoryResourceTransport {
    shapes: HashMap<&'static str, CollectionShape>,
    collections: RwLock<Collections>,
}

impl InMemoryResourceTransport {
    /// Creates a transport with no collections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the collection of `T`, seeded with `records`.
    ///
    /// Seeded records without an id are assigned one.
    pub fn with_records<T: Resource>(mut self, records: &[T]) -> AppResult<Self> {
        self.shapes.insert(
            T::RESOURCE,
            CollectionShape {
                parent: T::PARENT,
                id_field: T::ID_FIELD,
                parent_id_field: T::PARENT_ID_FIELD,
            },
        );

        let collections = self.collections.get_mut();
        for record in records {
            let value = serde_json::to_value(record).map_err(|error| {
                AppError::Internal(format!(
                    "failed to seed {} record: {error}",
                    T::RESOURCE
                ))
            })?;
            let Value::Object(mut fields) = value else {
                return Err(AppError::Validation(format!(
                    "{} records must serialise to objects",
                    T::RESOURCE
                )));
            };

            let id = match fields.get(T::ID_FIELD).and_then(Value::as_u64) {
                Some(id) => id,
                None => {
                    let id = collections.next_id + 1;
                    fields.insert(T::ID_FIELD.to_owned(), json!(id));
                    id
                }
            };
            collections.next_id = collections.next_id.max(id);
            collections.records.entry(T::RESOURCE).or_default().push(fields);
        }
        collections.records.entry(T::RESOURCE).or_default();

        Ok(self)
    }

    /// Registers an empty collection of `T`.
    pub fn with_resource<T: Resource>(self) -> AppResult<Self> {
        self.with_records::<T>(&[])
    }

    fn shape(&self, resource: &str) -> Result<(&'static str, CollectionShape), TransportError> {
        self.shapes
            .get_key_value(resource)
            .map(|(name, shape)| (*name, *shape))
            .ok_or_else(|| not_found(format!("unknown collection '{resource}'")))
    }
}

fn not_found(message: String) -> TransportError {
    TransportError::from_status(404, message)
}

fn parse_id(segment: &str) -> Result<u64, TransportError> {
    segment
        .parse()
        .map_err(|_| TransportError::from_status(400, format!("invalid id '{segment}'")))
}

fn matches_id(record: &Map<String, Value>, field: &str, id: u64) -> bool {
    record.get(field).and_then(Value::as_u64) == Some(id)
}

#[async_trait]
impl ResourceTransport for InMemoryResourceTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let collections = self.collections.read().await;

        match segments.as_slice() {
            [resource] => {
                let (name, _) = self.shape(resource)?;
                let records = collections.records.get(name).cloned().unwrap_or_default();
                Ok(Value::Array(records.into_iter().map(Value::Object).collect()))
            }
            [resource, id] => {
                let (name, shape) = self.shape(resource)?;
                let id = parse_id(id)?;
                collections
                    .records
                    .get(name)
                    .and_then(|records| {
                        records
                            .iter()
                            .find(|record| matches_id(record, shape.id_field, id))
                    })
                    .map(|record| Value::Object(record.clone()))
                    .ok_or_else(|| not_found(format!("{name} '{id}' does not exist")))
            }
            [parent, parent_id, resource] => {
                let (name, shape) = self.shape(resource)?;
                if shape.parent != *parent {
                    return Err(not_found(format!("{name} are not listed under {parent}")));
                }
                let parent_id = parse_id(parent_id)?;
                let records = collections
                    .records
                    .get(name)
                    .map(|records| {
                        records
                            .iter()
                            .filter(|record| matches_id(record, shape.parent_id_field, parent_id))
                            .cloned()
                            .map(Value::Object)
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(Value::Array(records))
            }
            _ => Err(not_found(format!("no route for GET {path}"))),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let (name, shape) = self.shape(path.trim_matches('/'))?;
        let Value::Object(mut fields) = body else {
            return Ok(json!({ "message": "request body must be an object" }));
        };

        let mut collections = self.collections.write().await;
        collections.next_id += 1;
        let id = collections.next_id;
        fields.insert(shape.id_field.to_owned(), json!(id));
        collections.records.entry(name).or_default().push(fields);

        Ok(json!({ "insertId": id }))
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let Some((resource, id)) = path.trim_matches('/').split_once('/') else {
            return Err(not_found(format!("no route for PUT {path}")));
        };
        let (name, shape) = self.shape(resource)?;
        let id = parse_id(id)?;
        let Value::Object(fields) = body else {
            return Ok(json!({ "message": "request body must be an object" }));
        };

        let mut collections = self.collections.write().await;
        let record = collections
            .records
            .get_mut(name)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|record| matches_id(record, shape.id_field, id))
            })
            .ok_or_else(|| not_found(format!("{name} '{id}' does not exist")))?;

        for (field, value) in fields {
            if field != shape.id_field {
                record.insert(field, value);
            }
        }

        Ok(json!({ "affectedRows": 1 }))
    }

    async fn delete(&self, path: &str) -> Result<Value, TransportError> {
        let Some((resource, id)) = path.trim_matches('/').split_once('/') else {
            return Err(not_found(format!("no route for DELETE {path}")));
        };
        let (name, shape) = self.shape(resource)?;
        let id = parse_id(id)?;

        let mut collections = self.collections.write().await;
        let records = collections.records.entry(name).or_default();
        let before = records.len();
        records.retain(|record| !matches_id(record, shape.id_field, id));

        if records.len() == before {
            return Err(not_found(format!("{name} '{id}' does not exist")));
        }

        Ok(json!({ "affectedRows": 1 }))
    }
}

#[cfg(test)]
mod tests;
