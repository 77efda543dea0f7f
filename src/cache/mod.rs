//! Optimistic cache layer — filter-keyed collections with patch-based
//! optimistic writes.
//!
//! The cache makes writes feel instantaneous while guaranteeing eventual
//! consistency with the authoritative store, and guaranteeing that a failed
//! write leaves the cache exactly as it was before the attempt.
//!
//! Each optimistic mutation is a forward patch in an append-only pending
//! log, overlaid on authoritative base values at read time. Rolling back
//! removes exactly that mutation's patch, so concurrent mutations on the
//! same resource compose — rolling one back never reverts another's effect.
//!
//! ## Example
//!
//! ```ignore
//! use optibridge::OptimisticCache;
//! use serde_json::json;
//!
//! let cache = OptimisticCache::new();
//! cache.prime("employees", &json!({}), json!([{ "id": 1, "firstName": "Jean" }]))?;
//!
//! let (temp_id, guard) = cache.begin_create("employees", json!({ "firstName": "Marie" }))?;
//! // ... authoritative write through the bridge ...
//! guard.commit()?;   // or guard.rollback()? on failure
//! ```

mod entry;
mod mutation;
mod store;

use std::fmt;

/// How trustworthy a cache entry currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Matches the last authoritative response.
    Fresh,
    /// Usable, but a refetch is recommended.
    Stale,
    /// A committed mutation touched this entry; it must be refetched.
    Invalidated,
}

/// Error type for cache operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Cache lock poisoned during the named operation.
    LockPoisoned(&'static str),
    /// The record or patch handed to an optimistic mutation was not a JSON
    /// object.
    InvalidRecord(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::LockPoisoned(operation) => {
                write!(f, "cache lock poisoned during {}", operation)
            }
            CacheError::InvalidRecord(msg) => write!(f, "invalid record: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

pub use mutation::MutationGuard;
pub use store::OptimisticCache;
