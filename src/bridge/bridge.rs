//! QueryBridge — resource registry and dispatch.
//!
//! `QueryBridge` holds a map from resource name to accessor. Every call goes
//! through `invoke`: registry lookup, typed dispatch on the operation, and
//! verbatim propagation of accessor failures. The bridge itself is stateless
//! and holds no data beyond the registry.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::{debug, error};

use crate::accessor::{Accessor, AccessorError};

use super::envelope::{Call, CallOutcome, Operation};
use super::error::BridgeError;

/// Dispatches `(resource, operation, input)` calls to registered accessors.
///
/// Generic transport surface: no schema-specific code exists here, however
/// many resources are registered.
#[derive(Default)]
pub struct QueryBridge {
    accessors: HashMap<String, Box<dyn Accessor>>,
}

impl QueryBridge {
    /// Create an empty bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an accessor for a resource name.
    ///
    /// Uses builder pattern — returns `self` for chaining. Registering the
    /// same name twice replaces the earlier accessor.
    pub fn resource(mut self, name: impl Into<String>, accessor: impl Accessor + 'static) -> Self {
        self.accessors.insert(name.into(), Box::new(accessor));
        self
    }

    /// List registered resource names.
    pub fn resources(&self) -> Vec<&str> {
        self.accessors.keys().map(|s| s.as_str()).collect()
    }

    /// Whether a resource name is registered.
    pub fn has_resource(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    /// Dispatch one operation against a resource.
    ///
    /// Fails with `UnknownResource` before any accessor runs if the name is
    /// unregistered, and with `UnknownOperation` if a custom query misses.
    /// Accessor failures are logged here with resource and operation for
    /// diagnostics, then re-raised unchanged.
    pub fn invoke(
        &self,
        resource: &str,
        operation: &Operation,
        input: Value,
    ) -> Result<Value, BridgeError> {
        let accessor = self
            .accessors
            .get(resource)
            .ok_or_else(|| BridgeError::UnknownResource(resource.to_string()))?;

        debug!(resource, operation = operation.name(), "dispatching call");

        let result = match operation {
            Operation::List => accessor.list(&input).map(Value::Array),
            Operation::Get => {
                let id = require_id(&input)?;
                accessor.get(id).map(|found| found.unwrap_or(Value::Null))
            }
            Operation::Create => accessor.create(&input),
            Operation::Update => {
                let id = require_id(&input)?;
                let patch = input.get("patch").ok_or_else(|| {
                    BridgeError::Decode("update input missing `patch` object".into())
                })?;
                accessor.update(id, patch)
            }
            Operation::Delete => {
                let id = require_id(&input)?;
                accessor.delete(id).map(Value::Bool)
            }
            Operation::Query(name) => accessor.query(name, &input),
        };

        match result {
            Ok(value) => Ok(value),
            Err(AccessorError::UnsupportedQuery(name)) => Err(BridgeError::UnknownOperation {
                resource: resource.to_string(),
                operation: name,
            }),
            Err(err) => {
                error!(
                    resource,
                    operation = operation.name(),
                    %err,
                    "accessor call failed"
                );
                Err(BridgeError::Accessor(err))
            }
        }
    }

    /// Dispatch a batch of calls strictly in submitted order, sequentially.
    ///
    /// All-or-nothing response policy: the first failure aborts the batch,
    /// later calls never run, and results from already-completed calls are
    /// discarded. No storage-level transaction is implied — side effects of
    /// completed calls persist.
    pub fn invoke_many(&self, calls: &[Call]) -> Result<Vec<Value>, BridgeError> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.invoke(&call.resource, &call.operation, call.input.clone())?);
        }
        Ok(results)
    }

    /// Dispatch a call envelope, returning a transport-ready outcome.
    pub fn dispatch(&self, call: &Call) -> CallOutcome {
        match self.invoke(&call.resource, &call.operation, call.input.clone()) {
            Ok(value) => CallOutcome {
                status: 200,
                body: value,
            },
            Err(e) => CallOutcome {
                status: e.status_code(),
                body: json!({ "error": e.to_string() }),
            },
        }
    }
}

/// Extract the required integer `id` field from an operation input.
fn require_id(input: &Value) -> Result<i64, BridgeError> {
    input
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| BridgeError::Decode("input missing integer `id`".into()))
}
