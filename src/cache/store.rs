//! OptimisticCache — filter-keyed collections with a pending-patch overlay.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::entry::{filter_key, CacheEntry};
use super::mutation::{MutationGuard, Patch, PendingMutation};
use super::{CacheError, Freshness};

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
#[cfg(feature = "emitter")]
use std::sync::Mutex;

struct CacheState {
    /// resource name -> canonical filter key -> entry
    entries: HashMap<String, HashMap<String, CacheEntry>>,
    /// Pending-mutation log, ordered by seq. Append-only while mutations are
    /// unsettled; rollback removes one entry, reconciliation retires
    /// committed ones.
    pending: Vec<PendingMutation>,
}

/// Client-held cache of entity collections, keyed by resource name and
/// canonical filter.
///
/// Reads overlay pending optimistic patches on authoritative base values;
/// the base is only ever replaced by `prime`/`reconcile` with data from the
/// store. Clone-friendly via Arc — clones share the same state.
#[derive(Clone)]
pub struct OptimisticCache {
    state: Arc<RwLock<CacheState>>,
    /// Next temporary id. Counts down from -1, so temp ids are disjoint
    /// from the store's positive ids by construction.
    temp_seq: Arc<AtomicI64>,
    mutation_seq: Arc<AtomicU64>,
    #[cfg(feature = "emitter")]
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for OptimisticCache {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimisticCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState {
                entries: HashMap::new(),
                pending: Vec::new(),
            })),
            temp_seq: Arc::new(AtomicI64::new(-1)),
            mutation_seq: Arc::new(AtomicU64::new(1)),
            #[cfg(feature = "emitter")]
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Store an authoritative fetch result for `(resource, filter)`,
    /// marking the entry `Fresh`. Pending patches are left untouched.
    pub fn prime(&self, resource: &str, filter: &Value, value: Value) -> Result<(), CacheError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CacheError::LockPoisoned("prime"))?;
        state
            .entries
            .entry(resource.to_string())
            .or_default()
            .insert(filter_key(filter), CacheEntry::fresh(filter.clone(), value));
        Ok(())
    }

    /// Last cached value for `(resource, filter)` with pending patches
    /// overlaid, or `None` if never fetched. A `None` means the caller must
    /// perform a real fetch through the bridge.
    pub fn read(&self, resource: &str, filter: &Value) -> Result<Option<Value>, CacheError> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::LockPoisoned("read"))?;

        let entry = match state
            .entries
            .get(resource)
            .and_then(|entries| entries.get(&filter_key(filter)))
        {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let mut value = entry.value.clone();
        for mutation in state.pending.iter().filter(|m| m.resource == resource) {
            mutation.patch.apply(&mut value);
        }
        Ok(Some(value))
    }

    /// Freshness of the entry for `(resource, filter)`, if cached.
    pub fn freshness(&self, resource: &str, filter: &Value) -> Result<Option<Freshness>, CacheError> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::LockPoisoned("freshness"))?;
        Ok(state
            .entries
            .get(resource)
            .and_then(|entries| entries.get(&filter_key(filter)))
            .map(|entry| entry.freshness))
    }

    /// Begin an optimistic create. The candidate gains a temporary id and
    /// becomes visible in every cached collection for the resource.
    ///
    /// Returns the temporary id and the guard that settles the mutation.
    pub fn begin_create(
        &self,
        resource: &str,
        candidate: Value,
    ) -> Result<(i64, MutationGuard), CacheError> {
        let mut record = match candidate {
            Value::Object(fields) => fields,
            _ => {
                return Err(CacheError::InvalidRecord(
                    "optimistic create requires a JSON object record".into(),
                ))
            }
        };

        let temp_id = self.temp_seq.fetch_sub(1, Ordering::SeqCst);
        record.insert("id".to_string(), Value::from(temp_id));

        let guard = self.push_mutation(
            resource,
            Patch::Create {
                record: Value::Object(record),
            },
        )?;
        Ok((temp_id, guard))
    }

    /// Begin an optimistic update, merging `fields` into the record with the
    /// given id across all cached entries for the resource.
    pub fn begin_update(
        &self,
        resource: &str,
        id: i64,
        fields: Value,
    ) -> Result<MutationGuard, CacheError> {
        if !fields.is_object() {
            return Err(CacheError::InvalidRecord(
                "optimistic update requires a JSON object patch".into(),
            ));
        }
        self.push_mutation(resource, Patch::Update { id, fields })
    }

    /// Begin an optimistic delete, removing the record with the given id
    /// from every cached entry for the resource.
    pub fn begin_delete(&self, resource: &str, id: i64) -> Result<MutationGuard, CacheError> {
        self.push_mutation(resource, Patch::Delete { id })
    }

    /// Replace the entry's base with an authoritative refetch result, mark
    /// it `Fresh`, and retire committed mutations for the resource — their
    /// effect is now reflected in store data, and this is the only path
    /// that ever removes a temporary id from the cache (replaced by the
    /// authoritative record, never merged).
    pub fn reconcile(&self, resource: &str, filter: &Value, value: Value) -> Result<(), CacheError> {
        {
            let mut state = self
                .state
                .write()
                .map_err(|_| CacheError::LockPoisoned("reconcile"))?;
            state
                .entries
                .entry(resource.to_string())
                .or_default()
                .insert(filter_key(filter), CacheEntry::fresh(filter.clone(), value));
            state
                .pending
                .retain(|m| !(m.resource == resource && m.committed));
        }
        self.notify(resource, "reconciled");
        Ok(())
    }

    /// Filters of entries that a committed mutation invalidated, for the
    /// caller's refetch loop.
    pub fn invalidated_filters(&self, resource: &str) -> Result<Vec<Value>, CacheError> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::LockPoisoned("invalidated_filters"))?;
        Ok(state
            .entries
            .get(resource)
            .map(|entries| {
                entries
                    .values()
                    .filter(|entry| entry.freshness == Freshness::Invalidated)
                    .map(|entry| entry.filter.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Externally mark every `Fresh` entry under the resource `Stale`
    /// (serve-while-revalidate). `Invalidated` entries keep the stronger
    /// flag.
    pub fn mark_stale(&self, resource: &str) -> Result<(), CacheError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CacheError::LockPoisoned("mark_stale"))?;
        if let Some(entries) = state.entries.get_mut(resource) {
            for entry in entries.values_mut() {
                if entry.freshness == Freshness::Fresh {
                    entry.freshness = Freshness::Stale;
                }
            }
        }
        Ok(())
    }

    /// Number of unsettled or committed-but-unreconciled mutations for the
    /// resource.
    pub fn pending_mutations(&self, resource: &str) -> usize {
        self.state
            .read()
            .map(|state| {
                state
                    .pending
                    .iter()
                    .filter(|m| m.resource == resource)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Register a listener for cache notifications on a resource.
    ///
    /// The listener receives `"committed"`, `"rolled_back"`, or
    /// `"reconciled"` whenever a mutation settles or an entry is
    /// reconciled — a UI layer can re-render without polling.
    #[cfg(feature = "emitter")]
    pub fn on<F>(&self, resource: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.on(resource, listener);
        }
    }

    fn push_mutation(&self, resource: &str, patch: Patch) -> Result<MutationGuard, CacheError> {
        let seq = self.mutation_seq.fetch_add(1, Ordering::SeqCst);
        let mut state = self
            .state
            .write()
            .map_err(|_| CacheError::LockPoisoned("begin mutation"))?;
        state.pending.push(PendingMutation {
            seq,
            resource: resource.to_string(),
            patch,
            committed: false,
        });
        Ok(MutationGuard::new(self.clone(), resource.to_string(), seq))
    }

    /// Settle a mutation as committed: its optimistic effect stays visible
    /// and every entry under the resource flips to `Invalidated`.
    pub(crate) fn commit_mutation(&self, resource: &str, seq: u64) -> Result<(), CacheError> {
        {
            let mut state = self
                .state
                .write()
                .map_err(|_| CacheError::LockPoisoned("commit"))?;
            if let Some(mutation) = state.pending.iter_mut().find(|m| m.seq == seq) {
                mutation.committed = true;
            }
            if let Some(entries) = state.entries.get_mut(resource) {
                for entry in entries.values_mut() {
                    entry.freshness = Freshness::Invalidated;
                }
            }
        }
        self.notify(resource, "committed");
        Ok(())
    }

    /// Settle a mutation as rolled back: its patch is removed and base
    /// entries — never touched by the mutation — stand as they were.
    pub(crate) fn rollback_mutation(&self, resource: &str, seq: u64) -> Result<(), CacheError> {
        {
            let mut state = self
                .state
                .write()
                .map_err(|_| CacheError::LockPoisoned("rollback"))?;
            state.pending.retain(|m| m.seq != seq);
        }
        self.notify(resource, "rolled_back");
        Ok(())
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, resource: &str, kind: &str) {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.emit(resource, kind.to_string());
        }
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _resource: &str, _kind: &str) {}
}
