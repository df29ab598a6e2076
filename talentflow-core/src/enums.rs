//! Enum types for TalentFlow entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CORE ENUMS
// ============================================================================

/// Collection discriminator for cache keys and store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Jobs,
    Candidates,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Jobs => write!(f, "jobs"),
            Collection::Candidates => write!(f, "candidates"),
        }
    }
}

/// Status of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Archived,
}

impl JobStatus {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Archived => "archived",
        }
    }

    /// The status a toggle (archive/unarchive) moves to.
    pub fn toggled(&self) -> Self {
        match self {
            JobStatus::Active => JobStatus::Archived,
            JobStatus::Archived => JobStatus::Active,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for JobStatus {
    type Err = StageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(JobStatus::Active),
            "archived" => Ok(JobStatus::Archived),
            _ => Err(StageParseError(s.to_string())),
        }
    }
}

/// Pipeline stage of a candidate - a finite, ordered hiring funnel.
///
/// A candidate holds exactly one stage at any time. Stage transitions are
/// recorded as append-only timeline events by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 6] = [
        Stage::Applied,
        Stage::Screen,
        Stage::Tech,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];

    /// Position of this stage in the pipeline (0-based).
    pub fn position(&self) -> usize {
        match self {
            Stage::Applied => 0,
            Stage::Screen => 1,
            Stage::Tech => 2,
            Stage::Offer => 3,
            Stage::Hired => 4,
            Stage::Rejected => 5,
        }
    }

    /// Whether this stage is terminal (no further funnel progress).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Hired | Stage::Rejected)
    }

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Stage::Applied => "applied",
            Stage::Screen => "screen",
            Stage::Tech => "tech",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for Stage {
    type Err = StageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "applied" => Ok(Stage::Applied),
            "screen" => Ok(Stage::Screen),
            "tech" => Ok(Stage::Tech),
            "offer" => Ok(Stage::Offer),
            "hired" => Ok(Stage::Hired),
            "rejected" => Ok(Stage::Rejected),
            _ => Err(StageParseError(s.to_string())),
        }
    }
}

/// Error when parsing an invalid stage or status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageParseError(pub String);

impl fmt::Display for StageParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid stage: {}", self.0)
    }
}

impl std::error::Error for StageParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_roundtrip() {
        for stage in Stage::ALL {
            let db_str = stage.as_db_str();
            let parsed: Stage = db_str.parse().unwrap();
            assert_eq!(stage, parsed);
        }
    }

    #[test]
    fn test_stage_positions_are_total() {
        let mut positions: Vec<usize> = Stage::ALL.iter().map(|s| s.position()).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_stage_parse_rejects_unknown() {
        assert!(matches!("interview".parse::<Stage>(), Err(StageParseError(_))));
    }

    #[test]
    fn test_job_status_toggle() {
        assert_eq!(JobStatus::Active.toggled(), JobStatus::Archived);
        assert_eq!(JobStatus::Archived.toggled(), JobStatus::Active);
    }

    #[test]
    fn test_job_status_roundtrip() {
        for status in [JobStatus::Active, JobStatus::Archived] {
            let parsed: JobStatus = status.as_db_str().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }
}
