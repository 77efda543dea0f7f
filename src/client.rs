//! Typed per-resource client over the bridge and cache.
//!
//! `ResourceClient` encodes the whole mutation discipline once: optimistic
//! write, authoritative call through the bridge, then commit plus
//! refetch-of-invalidated-entries on success or rollback on failure. The
//! per-entity hooks the observed pattern duplicates collapse into this one
//! generic implementation.
//!
//! ## Example
//!
//! ```ignore
//! use optibridge::{Resource, ResourceClient};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Clone)]
//! struct Employee {
//!     id: i64,
//!     first_name: String,
//! }
//!
//! impl Resource for Employee {
//!     const NAME: &'static str = "employees";
//!     fn id(&self) -> i64 { self.id }
//! }
//!
//! let client = ResourceClient::<Employee>::new(bridge, cache);
//! let employees = client.list(&json!({}))?;
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::bridge::{BridgeError, Operation, QueryBridge};
use crate::cache::{CacheError, Freshness, OptimisticCache};

/// Trait for entity types served through a `ResourceClient`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The resource name this type is registered under in the bridge.
    const NAME: &'static str;

    /// Returns the record's identifier.
    fn id(&self) -> i64;
}

/// Error type for typed client operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Bridge dispatch failed.
    Bridge(BridgeError),
    /// Cache operation failed.
    Cache(CacheError),
    /// A record did not deserialize into the resource type.
    Decode(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Bridge(e) => write!(f, "{}", e),
            ClientError::Cache(e) => write!(f, "{}", e),
            ClientError::Decode(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<BridgeError> for ClientError {
    fn from(err: BridgeError) -> Self {
        ClientError::Bridge(err)
    }
}

impl From<CacheError> for ClientError {
    fn from(err: CacheError) -> Self {
        ClientError::Cache(err)
    }
}

/// Typed client for one resource, combining the bridge and the optimistic
/// cache.
pub struct ResourceClient<M> {
    bridge: Arc<QueryBridge>,
    cache: OptimisticCache,
    _marker: PhantomData<M>,
}

impl<M> Clone for ResourceClient<M> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
            cache: self.cache.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M: Resource> ResourceClient<M> {
    /// Build a client for resource `M` over a shared bridge and cache.
    pub fn new(bridge: Arc<QueryBridge>, cache: OptimisticCache) -> Self {
        Self {
            bridge,
            cache,
            _marker: PhantomData,
        }
    }

    /// The shared cache.
    pub fn cache(&self) -> &OptimisticCache {
        &self.cache
    }

    /// The shared bridge.
    pub fn bridge(&self) -> &Arc<QueryBridge> {
        &self.bridge
    }

    /// List records matching a filter, read-through.
    ///
    /// A `Fresh` cache entry is served with pending patches overlaid;
    /// anything else (miss, `Stale`, `Invalidated`) fetches through the
    /// bridge and reconciles before serving.
    pub fn list(&self, filter: &Value) -> Result<Vec<M>, ClientError> {
        let fresh = matches!(
            self.cache.freshness(M::NAME, filter)?,
            Some(Freshness::Fresh)
        );
        if !fresh {
            let values = self.bridge.invoke(M::NAME, &Operation::List, filter.clone())?;
            self.cache.reconcile(M::NAME, filter, values)?;
        }

        let value = self
            .cache
            .read(M::NAME, filter)?
            .unwrap_or_else(|| Value::Array(Vec::new()));
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Get a single record by id, uncached.
    pub fn get(&self, id: i64) -> Result<Option<M>, ClientError> {
        let value = self
            .bridge
            .invoke(M::NAME, &Operation::Get, json!({ "id": id }))?;
        match value {
            Value::Null => Ok(None),
            found => serde_json::from_value(found)
                .map(Some)
                .map_err(|e| ClientError::Decode(e.to_string())),
        }
    }

    /// Create a record optimistically.
    ///
    /// The draft appears in every cached collection immediately under a
    /// temporary id. On success the mutation commits and invalidated
    /// entries are refetched, replacing the temporary id with the
    /// authoritative record; on failure it rolls back and the cache shows
    /// no trace of the attempt.
    pub fn create<D: Serialize>(&self, draft: &D) -> Result<M, ClientError> {
        let candidate =
            serde_json::to_value(draft).map_err(|e| ClientError::Decode(e.to_string()))?;

        let (_temp_id, guard) = self.cache.begin_create(M::NAME, candidate.clone())?;
        match self.bridge.invoke(M::NAME, &Operation::Create, candidate) {
            Ok(created) => {
                guard.commit()?;
                self.refetch_invalidated()?;
                serde_json::from_value(created).map_err(|e| ClientError::Decode(e.to_string()))
            }
            Err(err) => {
                guard.rollback()?;
                Err(err.into())
            }
        }
    }

    /// Update a record optimistically, merging a patch object by id.
    pub fn update<D: Serialize>(&self, id: i64, patch: &D) -> Result<M, ClientError> {
        let fields =
            serde_json::to_value(patch).map_err(|e| ClientError::Decode(e.to_string()))?;

        let guard = self.cache.begin_update(M::NAME, id, fields.clone())?;
        match self.bridge.invoke(
            M::NAME,
            &Operation::Update,
            json!({ "id": id, "patch": fields }),
        ) {
            Ok(updated) => {
                guard.commit()?;
                self.refetch_invalidated()?;
                serde_json::from_value(updated).map_err(|e| ClientError::Decode(e.to_string()))
            }
            Err(err) => {
                guard.rollback()?;
                Err(err.into())
            }
        }
    }

    /// Delete a record optimistically. Returns whether it existed.
    pub fn delete(&self, id: i64) -> Result<bool, ClientError> {
        let guard = self.cache.begin_delete(M::NAME, id)?;
        match self
            .bridge
            .invoke(M::NAME, &Operation::Delete, json!({ "id": id }))
        {
            Ok(deleted) => {
                guard.commit()?;
                self.refetch_invalidated()?;
                Ok(deleted.as_bool().unwrap_or(false))
            }
            Err(err) => {
                guard.rollback()?;
                Err(err.into())
            }
        }
    }

    /// Run a resource-specific named query, uncached.
    pub fn query(&self, name: &str, input: Value) -> Result<Value, ClientError> {
        Ok(self
            .bridge
            .invoke(M::NAME, &Operation::Query(name.to_string()), input)?)
    }

    /// Refetch every invalidated entry for the resource and reconcile it
    /// with authoritative truth.
    fn refetch_invalidated(&self) -> Result<(), ClientError> {
        for filter in self.cache.invalidated_filters(M::NAME)? {
            let values = self.bridge.invoke(M::NAME, &Operation::List, filter.clone())?;
            self.cache.reconcile(M::NAME, &filter, values)?;
        }
        Ok(())
    }
}
