//! Mutation intents
//!
//! A mutation intent is a value object describing one requested change,
//! carrying enough information to both apply the change speculatively and
//! validate it against the current snapshot. Intents are created
//! synchronously from a user gesture, consumed once by the engine, and
//! discarded after settle-or-rollback.

use crate::{CandidateId, JobId, JobStatus, Stage};
use serde::{Deserialize, Serialize};

/// Requested change against the candidates collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CandidateIntent {
    /// Move one candidate to a new pipeline stage.
    ///
    /// `from` is the stage the UI observed when the gesture started; the
    /// engine rejects the intent if the snapshot disagrees, since that means
    /// UI and engine state have diverged.
    StageChange {
        candidate_id: CandidateId,
        from: Stage,
        to: Stage,
    },
}

impl CandidateIntent {
    /// Human-readable operation name, used in failure notifications.
    pub fn describe(&self) -> &'static str {
        match self {
            CandidateIntent::StageChange { .. } => "move candidate",
        }
    }
}

/// Field edits for a single job. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobEdit {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<JobStatus>,
    pub tags: Option<Vec<String>>,
}

impl JobEdit {
    /// Edit that only toggles archive status.
    pub fn set_status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.slug.is_none() && self.status.is_none() && self.tags.is_none()
    }
}

/// Requested change against the jobs collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobIntent {
    /// Replace the entire list ordering. Every job's `order` field becomes
    /// its 1-based position in `ids_in_new_order`.
    Reorder { ids_in_new_order: Vec<JobId> },
    /// Edit fields of a single job (archive/unarchive, title, slug, tags).
    Edit { job_id: JobId, edit: JobEdit },
}

impl JobIntent {
    /// Human-readable operation name, used in failure notifications.
    pub fn describe(&self) -> &'static str {
        match self {
            JobIntent::Reorder { .. } => "reorder jobs",
            JobIntent::Edit { .. } => "update job",
        }
    }
}
