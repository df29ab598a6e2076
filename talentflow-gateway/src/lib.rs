//! TalentFlow Gateway - Simulated RPC Boundary
//!
//! The engine never touches the record store directly; every read and
//! mutation crosses this boundary. The simulated implementation introduces
//! randomized delay on every call and, with independent probability, returns
//! a failure instead of applying a mutation - 5% on single-record paths and
//! 50% on the bulk reorder. Both behaviors are pluggable policies so tests
//! can force deterministic outcomes.

pub mod policy;
pub mod simulated;

pub use policy::{
    AlwaysFail, AlwaysSucceed, FailOnNth, FailurePolicy, GatewayOp, LatencyPolicy, RandomFailure,
};
pub use simulated::SimulatedGateway;

use async_trait::async_trait;
use talentflow_core::{
    Candidate, CandidateFilter, CandidateId, Job, JobFilter, JobId, NewJob, Stage, TimelineEvent,
};
use talentflow_store::JobUpdate;

pub use talentflow_core::GatewayError;

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// The RPC boundary the engine dispatches mutations through.
///
/// The engine treats any `Err` identically: it does not distinguish an
/// injected failure from a rejection - every non-success collapses to the
/// same rollback path.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Read path: ordered jobs matching the filter.
    async fn fetch_jobs(&self, filter: &JobFilter) -> GatewayResult<Vec<Job>>;

    /// Read path: ordered candidates matching the filter.
    async fn fetch_candidates(&self, filter: &CandidateFilter) -> GatewayResult<Vec<Candidate>>;

    /// Create a job at the end of the list (`order = max + 1`).
    async fn create_job(&self, new_job: NewJob) -> GatewayResult<Job>;

    /// Update a single job's fields.
    async fn update_job(&self, id: JobId, update: JobUpdate) -> GatewayResult<Job>;

    /// Move a candidate to a new stage. On success the store records exactly
    /// one timeline event for the transition.
    async fn update_candidate_stage(&self, id: CandidateId, to: Stage)
        -> GatewayResult<Candidate>;

    /// Atomic reorder: on success every job's `order` equals its 1-based
    /// position in `ids_in_new_order`.
    async fn reorder_jobs(&self, ids_in_new_order: &[JobId]) -> GatewayResult<()>;

    /// Read path: a candidate's append-only timeline.
    async fn timeline(&self, candidate_id: CandidateId) -> GatewayResult<Vec<TimelineEvent>>;
}
