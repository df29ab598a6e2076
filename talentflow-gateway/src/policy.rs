//! Latency and failure-injection policies
//!
//! The simulated gateway is deliberately adversarial: randomized delay on
//! every call, and randomized failure on mutations. Both behaviors are
//! pluggable so tests can substitute deterministic policies
//! (always-succeed, always-fail, Nth-call-fails) for real randomness.

use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Operation discriminator handed to the failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    FetchJobs,
    FetchCandidates,
    CreateJob,
    UpdateJob,
    UpdateCandidateStage,
    ReorderJobs,
    Timeline,
}

impl GatewayOp {
    /// Whether this operation mutates the record store.
    ///
    /// Reads are never failure-injected; only mutations are.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            GatewayOp::CreateJob
                | GatewayOp::UpdateJob
                | GatewayOp::UpdateCandidateStage
                | GatewayOp::ReorderJobs
        )
    }

    /// Human-readable operation name for error messages and logs.
    pub fn describe(&self) -> &'static str {
        match self {
            GatewayOp::FetchJobs => "fetch jobs",
            GatewayOp::FetchCandidates => "fetch candidates",
            GatewayOp::CreateJob => "create job",
            GatewayOp::UpdateJob => "update job",
            GatewayOp::UpdateCandidateStage => "update candidate stage",
            GatewayOp::ReorderJobs => "reorder jobs",
            GatewayOp::Timeline => "fetch timeline",
        }
    }
}

impl fmt::Display for GatewayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

// ============================================================================
// LATENCY
// ============================================================================

/// Delay applied before every gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatencyPolicy {
    /// Delay drawn uniformly from `[min, max]`.
    Uniform { min: Duration, max: Duration },
    /// No delay. Used by tests.
    None,
}

impl LatencyPolicy {
    /// The production default: 200ms to 1200ms.
    pub fn simulated() -> Self {
        LatencyPolicy::Uniform {
            min: Duration::from_millis(200),
            max: Duration::from_millis(1200),
        }
    }

    /// Draw one delay from the policy.
    pub fn draw(&self) -> Duration {
        match self {
            LatencyPolicy::Uniform { min, max } => {
                let min_ms = min.as_millis() as u64;
                let max_ms = max.as_millis() as u64;
                Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
            }
            LatencyPolicy::None => Duration::ZERO,
        }
    }
}

// ============================================================================
// FAILURE INJECTION
// ============================================================================

/// Decides, per call, whether the gateway injects a failure.
///
/// Implementations must be cheap and thread-safe: the gateway consults the
/// policy once per mutation after the latency delay elapses.
pub trait FailurePolicy: Send + Sync {
    /// Returns true if this call should fail.
    fn decide(&self, op: GatewayOp) -> bool;
}

/// Independent random failure per call.
///
/// Single-record mutations fail at `mutation_rate` (default 5%); the bulk
/// reorder fails at `reorder_rate` (default 50%, deliberately high to
/// exercise rollback under stress).
#[derive(Debug, Clone)]
pub struct RandomFailure {
    pub mutation_rate: f64,
    pub reorder_rate: f64,
}

impl Default for RandomFailure {
    fn default() -> Self {
        Self {
            mutation_rate: 0.05,
            reorder_rate: 0.5,
        }
    }
}

impl FailurePolicy for RandomFailure {
    fn decide(&self, op: GatewayOp) -> bool {
        let rate = match op {
            GatewayOp::ReorderJobs => self.reorder_rate,
            _ => self.mutation_rate,
        };
        rand::rng().random_bool(rate.clamp(0.0, 1.0))
    }
}

/// Never injects a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSucceed;

impl FailurePolicy for AlwaysSucceed {
    fn decide(&self, _op: GatewayOp) -> bool {
        false
    }
}

/// Fails every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFail;

impl FailurePolicy for AlwaysFail {
    fn decide(&self, _op: GatewayOp) -> bool {
        true
    }
}

/// Fails exactly the Nth mutation (1-based), succeeds otherwise.
#[derive(Debug)]
pub struct FailOnNth {
    target: u64,
    calls: AtomicU64,
}

impl FailOnNth {
    pub fn new(target: u64) -> Self {
        Self {
            target,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of mutations seen so far.
    pub fn calls_seen(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FailurePolicy for FailOnNth {
    fn decide(&self, _op: GatewayOp) -> bool {
        let seen = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        seen == self.target
    }
}
