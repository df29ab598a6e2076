//! Mutation outcome and lifecycle phases
//!
//! The engine resolves every dispatched mutation to a structured outcome
//! instead of registering begin/error/settle callbacks: callers branch on
//! the discriminant. Expected gateway failures surface here, never as
//! errors.

use std::fmt;

/// Terminal result of one mutation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    /// The gateway accepted the mutation; `records` is the cache entry after
    /// settle and reconciliation.
    Settled { records: Vec<T> },
    /// The gateway failed the mutation; the cache was restored to the exact
    /// pre-mutation snapshot. `operation` names the user action for the
    /// failure notification.
    RolledBack {
        operation: &'static str,
        reason: String,
    },
}

impl<T> MutationOutcome<T> {
    pub fn is_settled(&self) -> bool {
        matches!(self, MutationOutcome::Settled { .. })
    }

    pub fn is_rolled_back(&self) -> bool {
        matches!(self, MutationOutcome::RolledBack { .. })
    }

    /// Records after settle, or `None` if rolled back.
    pub fn settled_records(&self) -> Option<&[T]> {
        match self {
            MutationOutcome::Settled { records } => Some(records),
            MutationOutcome::RolledBack { .. } => None,
        }
    }

    /// The user-facing notification for a rollback, e.g.
    /// `"reorder jobs failed and was rolled back: ..."`.
    pub fn failure_notice(&self) -> Option<String> {
        match self {
            MutationOutcome::Settled { .. } => None,
            MutationOutcome::RolledBack { operation, reason } => {
                Some(format!("{} failed and was rolled back: {}", operation, reason))
            }
        }
    }
}

/// Lifecycle of one mutation attempt.
///
/// `Speculating` is entered synchronously with the user gesture; awaiting
/// the gateway response is the only suspension point. There is no mid-flight
/// abort: every attempt ends in `Settled` or `RolledBack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Speculating,
    AwaitingServer,
    Settled,
    RolledBack,
}

impl MutationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationPhase::Idle => "idle",
            MutationPhase::Speculating => "speculating",
            MutationPhase::AwaitingServer => "awaiting_server",
            MutationPhase::Settled => "settled",
            MutationPhase::RolledBack => "rolled_back",
        }
    }
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
