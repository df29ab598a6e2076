//! Error types for TalentFlow operations
//!
//! Expected gateway failures (injected or transport) are not errors at the
//! engine boundary - the engine resolves them to a rollback outcome. The
//! variants here cover the store, the gateway transport, and engine logic
//! errors (intents that contradict the current snapshot).

use crate::{Collection, Stage};
use thiserror::Error;
use uuid::Uuid;

/// Record store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found: {collection} with id {id}")]
    NotFound { collection: Collection, id: Uuid },

    #[error("Insert failed for {collection}: {reason}")]
    InsertFailed { collection: Collection, reason: String },

    #[error("Update failed for {collection} with id {id}: {reason}")]
    UpdateFailed {
        collection: Collection,
        id: Uuid,
        reason: String,
    },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Network gateway errors.
///
/// The engine must not branch on the cause: any variant collapses to the
/// same rollback path. The variants exist for logging and for the failure
/// notification shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Simulated network error during {operation}")]
    Injected { operation: String },

    #[error("Request rejected: {reason}")]
    Rejected { reason: String },

    #[error("Store error behind gateway: {0}")]
    Store(#[from] StoreError),
}

/// Engine logic errors.
///
/// These indicate the UI and engine state have diverged; they propagate as
/// errors rather than resolving to a rollback outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Record {id} is not in the cached snapshot for {collection}")]
    RecordNotInSnapshot { collection: Collection, id: Uuid },

    #[error("Candidate {candidate_id} is in stage {found}, intent expected {expected}")]
    StageMismatch {
        candidate_id: Uuid,
        expected: Stage,
        found: Stage,
    },

    #[error("Reorder ids do not match the cached snapshot: {reason}")]
    ReorderMismatch { reason: String },

    #[error("Intent would change nothing")]
    EmptyIntent,
}

/// Master error type for all TalentFlow errors.
#[derive(Debug, Clone, Error)]
pub enum TalentFlowError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Result type alias for TalentFlow operations.
pub type TalentFlowResult<T> = Result<T, TalentFlowError>;

// =============================================================================
// TESTS
// =============================================================================
