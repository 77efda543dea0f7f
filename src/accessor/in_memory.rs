//! InMemoryAccessor - Vec-backed accessor for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

use crate::record;

use super::{Accessor, AccessorError};

type QueryFn = dyn Fn(&[Value], &Value) -> Result<Value, AccessorError> + Send + Sync;

/// In-memory accessor backed by a Vec of records.
///
/// Ids are monotonic positive integers assigned on create. Unique-field
/// constraints can be declared at build time; violating one fails the
/// create with `Conflict`, the way a store-level unique index would.
/// Clone-friendly via Arc — clones share the same records.
pub struct InMemoryAccessor {
    resource: String,
    records: Arc<RwLock<Vec<Value>>>,
    id_seq: Arc<AtomicI64>,
    unique_fields: Vec<String>,
    queries: HashMap<String, Arc<QueryFn>>,
}

impl Clone for InMemoryAccessor {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            records: Arc::clone(&self.records),
            id_seq: Arc::clone(&self.id_seq),
            unique_fields: self.unique_fields.clone(),
            queries: self.queries.clone(),
        }
    }
}

impl InMemoryAccessor {
    /// Create an empty accessor for the given resource name.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            records: Arc::new(RwLock::new(Vec::new())),
            id_seq: Arc::new(AtomicI64::new(1)),
            unique_fields: Vec::new(),
            queries: HashMap::new(),
        }
    }

    /// Seed the accessor with existing records. Each record must carry its
    /// own positive id; the id sequence continues past the highest one.
    pub fn seeded(self, records: Vec<Value>) -> Self {
        let max_id = records.iter().filter_map(record::id_of).max().unwrap_or(0);
        self.id_seq.store(max_id + 1, Ordering::SeqCst);
        if let Ok(mut storage) = self.records.write() {
            *storage = records;
        }
        self
    }

    /// Declare a unique constraint on a field. Creates that duplicate an
    /// existing record's value for this field fail with `Conflict`.
    pub fn unique_on(mut self, field: impl Into<String>) -> Self {
        self.unique_fields.push(field.into());
        self
    }

    /// Register a named query. The closure receives a snapshot of the
    /// current records and the query input.
    pub fn with_query<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value], &Value) -> Result<Value, AccessorError> + Send + Sync + 'static,
    {
        self.queries.insert(name.into(), Arc::new(f));
        self
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_records(&self) -> Result<Vec<Value>, AccessorError> {
        Ok(self
            .records
            .read()
            .map_err(|_| AccessorError::Storage("lock poisoned".into()))?
            .clone())
    }

    fn matches(record: &Value, filter: &Map<String, Value>) -> bool {
        filter.iter().all(|(key, expected)| record.get(key) == Some(expected))
    }
}

impl Accessor for InMemoryAccessor {
    fn list(&self, filter: &Value) -> Result<Vec<Value>, AccessorError> {
        let records = self.read_records()?;
        match filter {
            Value::Null => Ok(records),
            Value::Object(fields) if fields.is_empty() => Ok(records),
            Value::Object(fields) => Ok(records
                .into_iter()
                .filter(|record| Self::matches(record, fields))
                .collect()),
            _ => Err(AccessorError::Rejected(
                "list filter must be a JSON object".into(),
            )),
        }
    }

    fn get(&self, id: i64) -> Result<Option<Value>, AccessorError> {
        let records = self.read_records()?;
        Ok(records.into_iter().find(|r| record::id_of(r) == Some(id)))
    }

    fn create(&self, input: &Value) -> Result<Value, AccessorError> {
        let fields = match input {
            Value::Object(fields) => fields.clone(),
            _ => {
                return Err(AccessorError::Rejected(
                    "create input must be a JSON object".into(),
                ))
            }
        };

        let mut storage = self
            .records
            .write()
            .map_err(|_| AccessorError::Storage("lock poisoned".into()))?;

        for field in &self.unique_fields {
            if let Some(value) = fields.get(field) {
                let taken = storage.iter().any(|r| r.get(field) == Some(value));
                if taken {
                    return Err(AccessorError::Conflict(format!(
                        "duplicate value for unique field `{}` on {}",
                        field, self.resource
                    )));
                }
            }
        }

        let id = self.id_seq.fetch_add(1, Ordering::SeqCst);
        let mut record = fields;
        record.insert("id".to_string(), Value::from(id));
        let record = Value::Object(record);
        storage.push(record.clone());

        Ok(record)
    }

    fn update(&self, id: i64, patch: &Value) -> Result<Value, AccessorError> {
        if !patch.is_object() {
            return Err(AccessorError::Rejected(
                "update patch must be a JSON object".into(),
            ));
        }

        let mut storage = self
            .records
            .write()
            .map_err(|_| AccessorError::Storage("lock poisoned".into()))?;

        let record = storage
            .iter_mut()
            .find(|r| record::id_of(r) == Some(id))
            .ok_or_else(|| AccessorError::NotFound {
                resource: self.resource.clone(),
                id,
            })?;

        record::merge_fields(record, patch);
        Ok(record.clone())
    }

    fn delete(&self, id: i64) -> Result<bool, AccessorError> {
        let mut storage = self
            .records
            .write()
            .map_err(|_| AccessorError::Storage("lock poisoned".into()))?;

        let before = storage.len();
        storage.retain(|r| record::id_of(r) != Some(id));
        Ok(storage.len() < before)
    }

    fn query(&self, name: &str, input: &Value) -> Result<Value, AccessorError> {
        let query = self
            .queries
            .get(name)
            .ok_or_else(|| AccessorError::UnsupportedQuery(name.to_string()))?;
        let records = self.read_records()?;
        query(&records, input)
    }
}
