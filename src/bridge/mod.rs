//! bridge — the generic query bridge.
//!
//! One dispatch surface maps a `(resource, operation, input)` triple onto a
//! registry of storage accessors. No resource-specific code exists on the
//! transport path: register an accessor per resource and every operation
//! flows through the same entry point.
//!
//! ## Quick Start
//!
//! ```ignore
//! use optibridge::{InMemoryAccessor, Operation, QueryBridge};
//! use serde_json::json;
//!
//! let bridge = QueryBridge::new()
//!     .resource("employees", InMemoryAccessor::new("employees"))
//!     .resource("positions", InMemoryAccessor::new("positions").unique_on("code"));
//!
//! let created = bridge.invoke("employees", &Operation::Create, json!({ "firstName": "Jean" }))?;
//! let all = bridge.invoke("employees", &Operation::List, json!({}))?;
//!
//! // HTTP transport (requires "http" feature)
//! // optibridge::serve(Arc::new(bridge), "127.0.0.1:3000").await?;
//! ```
//!
//! Standard operations (`list`, `get`, `create`, `update`, `delete`) resolve
//! against `Accessor` trait methods at compile time; only named custom
//! queries can miss, failing with `UnknownOperation`. An unregistered
//! resource name fails with `UnknownResource` before any accessor runs.

mod bridge;
mod envelope;
mod error;

pub use bridge::QueryBridge;
pub use envelope::{Call, CallOutcome, Operation};
pub use error::BridgeError;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Register several accessors on a bridge at once.
///
/// # Example
/// ```ignore
/// let bridge = optibridge::accessors!(
///     QueryBridge::new(),
///     "employees" => InMemoryAccessor::new("employees"),
///     "positions" => InMemoryAccessor::new("positions"),
/// );
/// ```
#[macro_export]
macro_rules! accessors {
    ($bridge:expr, $( $name:literal => $accessor:expr ),+ $(,)?) => {
        $bridge
        $(
            .resource($name, $accessor)
        )+
    };
}
