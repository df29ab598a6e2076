//! Read cache keyed by (collection, filter)
//!
//! Maps a filter to the most recently known correct ordered sequence of
//! records. The cache is an explicit handle - callers obtain it and pass it
//! to the engine; there is no hidden global. During an in-flight mutation
//! the engine exclusively owns the entry for that key via the per-key lock,
//! so a concurrent filter refresh can never interleave with a speculative
//! write.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex, RwLock};

use chrono::Utc;
use talentflow_core::{Candidate, CandidateFilter, Collection, Job, JobFilter, Timestamp};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

/// Marker trait for record types the cache can hold.
pub trait CachedRecord: Clone + PartialEq + Send + Sync + 'static {
    /// The filter type that keys cache entries for this collection.
    type Filter: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static;

    /// Unique identifier of this record.
    fn record_id(&self) -> Uuid;

    /// The collection this record belongs to.
    fn collection() -> Collection;
}

impl CachedRecord for Job {
    type Filter = JobFilter;

    fn record_id(&self) -> Uuid {
        self.job_id
    }

    fn collection() -> Collection {
        Collection::Jobs
    }
}

impl CachedRecord for Candidate {
    type Filter = CandidateFilter;

    fn record_id(&self) -> Uuid {
        self.candidate_id
    }

    fn collection() -> Collection {
        Collection::Candidates
    }
}

/// Whether an entry reflects server-confirmed truth or a speculative write
/// awaiting confirmation. Renderers may use this to style in-flight rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryProvenance {
    ServerConfirmed,
    Speculative,
}

/// One cached query result: the last known ordered sequence for a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub records: Vec<T>,
    pub fetched_at: Timestamp,
    pub provenance: EntryProvenance,
}

impl<T: CachedRecord> CacheEntry<T> {
    /// Entry holding server-confirmed records.
    pub fn confirmed(records: Vec<T>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
            provenance: EntryProvenance::ServerConfirmed,
        }
    }

    /// Entry holding a speculative (optimistically applied) sequence.
    pub fn speculative(records: Vec<T>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
            provenance: EntryProvenance::Speculative,
        }
    }

    /// Empty confirmed entry, used when no prior read populated the key.
    pub fn empty() -> Self {
        Self::confirmed(Vec::new())
    }

    /// Find a record by id.
    pub fn find(&self, id: Uuid) -> Option<&T> {
        self.records.iter().find(|r| r.record_id() == id)
    }

    /// Ids of all records, in sequence order.
    pub fn ids(&self) -> Vec<Uuid> {
        self.records.iter().map(|r| r.record_id()).collect()
    }
}

/// Per-key async mutexes guarding the speculate -> settle/rollback cycle.
///
/// The map itself is guarded by a std mutex held only for the lookup; the
/// returned handle is awaited outside it.
struct KeyLocks<K> {
    inner: StdMutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K: Clone + Eq + Hash> KeyLocks<K> {
    fn new() -> Self {
        Self {
            inner: StdMutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, key: &K) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

/// Cache for one collection, keyed by filter.
pub struct CollectionCache<T: CachedRecord> {
    entries: RwLock<HashMap<T::Filter, CacheEntry<T>>>,
    locks: KeyLocks<T::Filter>,
}

impl<T: CachedRecord> CollectionCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            locks: KeyLocks::new(),
        }
    }

    /// Last known entry for a filter, if a prior read populated it.
    pub fn get(&self, filter: &T::Filter) -> Option<CacheEntry<T>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(filter).cloned()
    }

    /// Install an entry, replacing whatever was there.
    pub fn set(&self, filter: T::Filter, entry: CacheEntry<T>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(filter, entry);
    }

    /// Drop an entry, forcing the next read to hit the gateway.
    pub fn invalidate(&self, filter: &T::Filter) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(filter).is_some()
    }

    /// Mark the current entry for a filter as server-confirmed.
    pub fn confirm(&self, filter: &T::Filter) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get_mut(filter) {
            entry.provenance = EntryProvenance::ServerConfirmed;
        }
    }

    /// The per-key mutex serializing mutations and refreshes on a filter.
    pub fn key_lock(&self, filter: &T::Filter) -> Arc<AsyncMutex<()>> {
        self.locks.lock_for(filter)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: CachedRecord> Default for CollectionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The session-scoped cache handle holding both collections.
///
/// Obtained explicitly by the application and shared (via `Arc`) between the
/// engine and any renderer that wants to observe cached state.
#[derive(Default)]
pub struct QueryCache {
    jobs: CollectionCache<Job>,
    candidates: CollectionCache<Candidate>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &CollectionCache<Job> {
        &self.jobs
    }

    pub fn candidates(&self) -> &CollectionCache<Candidate> {
        &self.candidates
    }
}
