//! Filter types that double as cache-key parameters
//!
//! A cache entry is keyed by (collection, filter), so filters must be
//! `Eq + Hash` and normalized: two logically equal filters must produce the
//! same key. Free-text terms are lowercased at construction time.

use crate::{Candidate, Collection, Job, JobStatus, Stage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter over the jobs collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    /// Case-insensitive substring match on the title. Stored lowercased.
    pub title_contains: Option<String>,
}

impl JobFilter {
    /// Match-all filter.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to titles containing the given term (case-insensitive).
    pub fn with_title(mut self, term: impl AsRef<str>) -> Self {
        self.title_contains = Some(term.as_ref().to_lowercase());
        self
    }

    /// Whether a job satisfies this filter.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        if let Some(term) = &self.title_contains {
            if !job.title.to_lowercase().contains(term) {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for JobFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "jobs")?;
        if let Some(status) = self.status {
            write!(f, "?status={}", status)?;
        }
        if let Some(term) = &self.title_contains {
            write!(f, "&title={}", term)?;
        }
        Ok(())
    }
}

/// Filter over the candidates collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CandidateFilter {
    /// Case-insensitive substring match on name or email. Stored lowercased.
    pub search: Option<String>,
    pub stage: Option<Stage>,
}

impl CandidateFilter {
    /// Match-all filter.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to name/email containing the given term (case-insensitive).
    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        self.search = Some(term.as_ref().to_lowercase());
        self
    }

    /// Restrict to a stage.
    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Whether a candidate satisfies this filter.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(stage) = self.stage {
            if candidate.stage != stage {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let hit = candidate.name.to_lowercase().contains(term)
                || candidate.email.to_lowercase().contains(term);
            if !hit {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for CandidateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "candidates")?;
        if let Some(term) = &self.search {
            write!(f, "?search={}", term)?;
        }
        if let Some(stage) = self.stage {
            write!(f, "&stage={}", stage)?;
        }
        Ok(())
    }
}

/// One (collection, filter) pairing identifying a cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    Jobs(JobFilter),
    Candidates(CandidateFilter),
}

impl CacheKey {
    /// The collection this key addresses.
    pub fn collection(&self) -> Collection {
        match self {
            CacheKey::Jobs(_) => Collection::Jobs,
            CacheKey::Candidates(_) => Collection::Candidates,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Jobs(filter) => write!(f, "{}", filter),
            CacheKey::Candidates(filter) => write!(f, "{}", filter),
        }
    }
}
