//! Cache entries and filter-key canonicalization.

use serde_json::Value;

use super::Freshness;

/// Canonical key for a filter value.
///
/// serde_json serializes object keys in sorted order, so structurally equal
/// filters produce the same key regardless of construction order.
pub(crate) fn filter_key(filter: &Value) -> String {
    filter.to_string()
}

/// One cached entry: the last authoritative value for a
/// `(resource, filter)` pair, plus its freshness flag.
///
/// The value is either a collection (JSON array) or a single record. Only
/// the cache's own API mutates entries.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    /// The filter this entry was fetched with, kept for refetching.
    pub filter: Value,
    /// Last authoritative value (array of records, or one record).
    pub value: Value,
    pub freshness: Freshness,
}

impl CacheEntry {
    pub fn fresh(filter: Value, value: Value) -> Self {
        Self {
            filter,
            value,
            freshness: Freshness::Fresh,
        }
    }
}
