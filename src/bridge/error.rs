//! Error types for bridge dispatch.

use std::error::Error;
use std::fmt;

use crate::accessor::AccessorError;

/// Error type for bridge dispatch.
///
/// `UnknownResource` and `UnknownOperation` are distinct kinds so callers
/// can branch on them; both indicate a programming error (stale caller after
/// a registry change), not a retryable condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Requested resource name is not in the registry.
    UnknownResource(String),
    /// Resource found, but it implements no operation with this name.
    UnknownOperation { resource: String, operation: String },
    /// Malformed envelope input (e.g. missing integer `id`).
    Decode(String),
    /// The underlying data operation failed. Propagated verbatim.
    Accessor(AccessorError),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::UnknownResource(name) => write!(f, "unknown resource: {}", name),
            BridgeError::UnknownOperation {
                resource,
                operation,
            } => write!(f, "unknown operation `{}` on resource `{}`", operation, resource),
            BridgeError::Decode(msg) => write!(f, "decode failed: {}", msg),
            // The accessor's original message, not wrapped.
            BridgeError::Accessor(e) => write!(f, "{}", e),
        }
    }
}

impl Error for BridgeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BridgeError::Accessor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AccessorError> for BridgeError {
    fn from(err: AccessorError) -> Self {
        BridgeError::Accessor(err)
    }
}

impl BridgeError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::UnknownResource(_) => 404,
            BridgeError::UnknownOperation { .. } => 404,
            BridgeError::Decode(_) => 400,
            BridgeError::Accessor(e) => match e {
                AccessorError::NotFound { .. } => 404,
                AccessorError::Conflict(_) => 409,
                AccessorError::Rejected(_) => 422,
                AccessorError::Storage(_) => 500,
                AccessorError::UnsupportedQuery(_) => 404,
            },
        }
    }
}
