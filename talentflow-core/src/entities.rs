//! Core entity structures

use crate::{CandidateId, EventId, JobId, JobStatus, Stage, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job posting - an ordered row in the jobs list.
///
/// `order` strictly defines display position: values are unique across the
/// collection and a reorder reassigns every affected job's `order` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: JobId,
    pub title: String,
    /// URL-safe identifier, unique within the store.
    pub slug: String,
    pub status: JobStatus,
    pub tags: Vec<String>,
    /// 1-based rank in the jobs list.
    pub order: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Create a new active job at the given rank.
    pub fn new(title: impl Into<String>, slug: impl Into<String>, order: i64) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::now_v7(),
            title: title.into(),
            slug: slug.into(),
            status: JobStatus::Active,
            tags: Vec::new(),
            order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request payload for creating a job through the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Candidate in the hiring pipeline.
///
/// `job_id` is a weak reference - the store does not enforce it as a foreign
/// key. A candidate holds exactly one stage at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: CandidateId,
    pub name: String,
    pub email: String,
    pub job_id: Option<JobId>,
    pub stage: Stage,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Candidate {
    /// Create a new candidate in the `Applied` stage.
    pub fn new(name: impl Into<String>, email: impl Into<String>, job_id: Option<JobId>) -> Self {
        let now = Utc::now();
        Self {
            candidate_id: Uuid::now_v7(),
            name: name.into(),
            email: email.into(),
            job_id,
            stage: Stage::Applied,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Append-only record of one stage transition.
///
/// Timeline events are written by the gateway handler when a stage change
/// settles, never on rollback, and are never rewritten or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub event_id: EventId,
    pub candidate_id: CandidateId,
    pub from_stage: Stage,
    pub to_stage: Stage,
    pub note: Option<String>,
    pub occurred_at: Timestamp,
}

impl TimelineEvent {
    /// Record a transition occurring now.
    pub fn transition(candidate_id: CandidateId, from_stage: Stage, to_stage: Stage) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            candidate_id,
            from_stage,
            to_stage,
            note: None,
            occurred_at: Utc::now(),
        }
    }
}
