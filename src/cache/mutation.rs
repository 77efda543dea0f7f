//! Pending mutations — forward patches with independent rollback.

use serde_json::Value;

use crate::record;

use super::store::OptimisticCache;
use super::CacheError;

/// The forward effect of one optimistic mutation.
#[derive(Debug, Clone)]
pub(crate) enum Patch {
    /// A record (carrying a temporary id) appended to every cached
    /// collection for the resource.
    Create { record: Value },
    /// Fields merged into matching records across all entries.
    Update { id: i64, fields: Value },
    /// Record removed from every affected entry.
    Delete { id: i64 },
}

impl Patch {
    /// Apply this patch to a cached value (collection or single record).
    pub fn apply(&self, value: &mut Value) {
        match self {
            Patch::Create { record } => {
                if let Value::Array(items) = value {
                    items.push(record.clone());
                }
            }
            Patch::Update { id, fields } => match value {
                Value::Array(items) => {
                    for item in items {
                        if record::id_of(item) == Some(*id) {
                            record::merge_fields(item, fields);
                        }
                    }
                }
                single => {
                    if record::id_of(single) == Some(*id) {
                        record::merge_fields(single, fields);
                    }
                }
            },
            Patch::Delete { id } => match value {
                Value::Array(items) => {
                    items.retain(|item| record::id_of(item) != Some(*id));
                }
                single => {
                    if record::id_of(single) == Some(*id) {
                        *single = Value::Null;
                    }
                }
            },
        }
    }
}

/// One entry in a resource's pending-mutation log.
#[derive(Debug, Clone)]
pub(crate) struct PendingMutation {
    pub seq: u64,
    pub resource: String,
    pub patch: Patch,
    /// Committed mutations stay visible until reconciliation retires them.
    pub committed: bool,
}

/// RAII handle for one optimistic mutation.
///
/// Exactly one of `commit` or `rollback` settles the mutation; both consume
/// the guard, so each can happen at most once. Dropping an unsettled guard
/// rolls the mutation back, so an error path that merely propagates with
/// `?` still restores the cache.
#[must_use = "dropping an unsettled guard rolls the mutation back"]
pub struct MutationGuard {
    cache: OptimisticCache,
    resource: String,
    seq: u64,
    settled: bool,
}

impl MutationGuard {
    pub(crate) fn new(cache: OptimisticCache, resource: String, seq: u64) -> Self {
        Self {
            cache,
            resource,
            seq,
            settled: false,
        }
    }

    /// The resource this mutation targets.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Keep the optimistic effect and invalidate every entry under the
    /// resource, scheduling reconciliation against authoritative truth.
    /// Call after the underlying write succeeded.
    pub fn commit(mut self) -> Result<(), CacheError> {
        self.settled = true;
        self.cache.commit_mutation(&self.resource, self.seq)
    }

    /// Remove this mutation's patch, restoring pre-mutation state verbatim.
    /// Call after the underlying write failed.
    pub fn rollback(mut self) -> Result<(), CacheError> {
        self.settled = true;
        self.cache.rollback_mutation(&self.resource, self.seq)
    }
}

impl std::fmt::Debug for MutationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationGuard")
            .field("resource", &self.resource)
            .field("seq", &self.seq)
            .field("settled", &self.settled)
            .finish_non_exhaustive()
    }
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        if !self.settled {
            let _ = self.cache.rollback_mutation(&self.resource, self.seq);
        }
    }
}
