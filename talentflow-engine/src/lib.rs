//! TalentFlow Engine - Read Cache and Optimistic Mutation Engine
//!
//! The only stateful, failure-sensitive subsystem of the pipeline UI: it
//! applies a user's change to the cached view before server confirmation,
//! rolls back cleanly and exactly on failure, serializes overlapping
//! mutations per cache key, and reconciles with server truth after settle.
//!
//! # Contract
//!
//! - A mutation attempt ends with the visible entry equal to either the
//!   intended new state or the exact pre-mutation snapshot.
//! - At most one in-flight mutation owns a given key's rollback snapshot;
//!   later mutations and refreshes queue behind a per-key async mutex.
//! - Expected gateway failures resolve to [`MutationOutcome::RolledBack`];
//!   only intents that contradict the cached snapshot return `Err`.

pub mod cache;
pub mod engine;
pub mod outcome;

pub use cache::{CacheEntry, CachedRecord, CollectionCache, EntryProvenance, QueryCache};
pub use engine::MutationEngine;
pub use outcome::{MutationOutcome, MutationPhase};
