//! Storage accessors — the privileged-side contract the bridge dispatches to.
//!
//! An accessor implements the data operations for exactly one resource
//! against the actual store. The bridge depends only on this trait, so SQL,
//! file-backed, and in-memory backends are interchangeable behind it.
//!
//! ## Example
//!
//! ```ignore
//! use optibridge::{InMemoryAccessor, QueryBridge};
//! use serde_json::json;
//!
//! let employees = InMemoryAccessor::new("employees")
//!     .seeded(vec![json!({ "id": 1, "firstName": "Jean" })]);
//!
//! let bridge = QueryBridge::new().resource("employees", employees);
//! ```

mod in_memory;

use std::fmt;

use serde_json::Value;

/// The data operations implemented for one resource.
///
/// Standard operations are plain trait methods and resolve at compile time.
/// Resource-specific queries (e.g. `activeByEmployee`) go through `query`,
/// which fails with `UnsupportedQuery` unless overridden.
pub trait Accessor: Send + Sync {
    /// List records matching a structural filter object.
    fn list(&self, filter: &Value) -> Result<Vec<Value>, AccessorError>;

    /// Get a single record by id. Returns `None` if not found.
    fn get(&self, id: i64) -> Result<Option<Value>, AccessorError>;

    /// Create a record from the given input, assigning its id.
    /// Returns the stored record.
    fn create(&self, input: &Value) -> Result<Value, AccessorError>;

    /// Merge a patch object into the record with the given id.
    /// Returns the updated record.
    fn update(&self, id: i64, patch: &Value) -> Result<Value, AccessorError>;

    /// Delete the record with the given id. Returns true if it existed.
    fn delete(&self, id: i64) -> Result<bool, AccessorError>;

    /// Run a resource-specific named query.
    fn query(&self, name: &str, input: &Value) -> Result<Value, AccessorError> {
        let _ = input;
        Err(AccessorError::UnsupportedQuery(name.to_string()))
    }
}

/// Error type for accessor operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorError {
    /// No record with the requested id.
    NotFound { resource: String, id: i64 },
    /// A store constraint was violated (e.g. duplicate unique value).
    Conflict(String),
    /// The input was rejected by validation.
    Rejected(String),
    /// Storage-level failure (store unreachable, lock poisoned).
    Storage(String),
    /// The accessor implements no query with this name.
    UnsupportedQuery(String),
}

impl fmt::Display for AccessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorError::NotFound { resource, id } => {
                write!(f, "record not found: {}:{}", resource, id)
            }
            AccessorError::Conflict(msg) => write!(f, "constraint violation: {}", msg),
            AccessorError::Rejected(msg) => write!(f, "rejected: {}", msg),
            AccessorError::Storage(msg) => write!(f, "storage error: {}", msg),
            AccessorError::UnsupportedQuery(name) => write!(f, "unsupported query: {}", name),
        }
    }
}

impl std::error::Error for AccessorError {}

pub use in_memory::InMemoryAccessor;
