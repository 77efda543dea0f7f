//! Call envelopes — the serialized request/response pair crossing the
//! transport boundary.
//!
//! An envelope is created per call and discarded after the response. Framing
//! is JSON; the only contract requirements are request/response pairing and
//! error propagation, both of which `Call`/`CallOutcome` preserve.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named data operation on a resource.
///
/// The standard operations form a closed set; resource-specific queries are
/// carried by name in `Query` and are the only variant that can miss at
/// dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Query(String),
}

impl Operation {
    /// The wire name of this operation.
    pub fn name(&self) -> &str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Query(name) => name,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Operation {
    fn from(name: String) -> Self {
        match name.as_str() {
            "list" => Operation::List,
            "get" => Operation::Get,
            "create" => Operation::Create,
            "update" => Operation::Update,
            "delete" => Operation::Delete,
            _ => Operation::Query(name),
        }
    }
}

impl From<Operation> for String {
    fn from(operation: Operation) -> Self {
        operation.name().to_string()
    }
}

impl From<&str> for Operation {
    fn from(name: &str) -> Self {
        Operation::from(name.to_string())
    }
}

/// An inbound call envelope.
///
/// ```json
/// { "resource": "employees", "operation": "update",
///   "input": { "id": 3, "patch": { "department": "HR" } } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    /// Logical resource name.
    pub resource: String,
    /// Operation to run against the resource's accessor.
    pub operation: Operation,
    /// Structured input object for the operation.
    #[serde(default)]
    pub input: Value,
}

impl Call {
    /// Build a call envelope.
    pub fn new(resource: impl Into<String>, operation: impl Into<Operation>, input: Value) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
            input,
        }
    }
}

/// Response from dispatching a call envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallOutcome {
    /// HTTP-style status code.
    pub status: u16,
    /// Response body (operation result or error).
    pub body: Value,
}
