//! TalentFlow Test Utilities
//!
//! Centralized test infrastructure for the TalentFlow workspace:
//! - Entity builders with sensible defaults
//! - Pre-seeded in-memory stores
//! - Deterministic gateway constructors (no latency, chosen failure policy)

use std::sync::Arc;

// Re-export the store and deterministic policies for convenience
pub use talentflow_gateway::{
    AlwaysFail, AlwaysSucceed, FailOnNth, FailurePolicy, LatencyPolicy, SimulatedGateway,
};
pub use talentflow_store::{seed::seed, InMemoryStore, RecordStore};

use talentflow_core::{Candidate, Job, Stage};

/// Build a job with a slug derived from the title.
pub fn make_job(title: &str, order: i64) -> Job {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    Job::new(title, format!("{}-{}", slug, order), order)
}

/// Build a candidate in the given stage.
pub fn make_candidate(name: &str, stage: Stage) -> Candidate {
    let email = format!(
        "{}@example.com",
        name.to_lowercase().replace(|c: char| !c.is_ascii_alphanumeric(), ".")
    );
    let mut candidate = Candidate::new(name, email, None);
    candidate.stage = stage;
    candidate
}

/// A store pre-populated with the given jobs and candidates.
pub fn store_with(jobs: &[Job], candidates: &[Candidate]) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for job in jobs {
        store.job_insert(job).expect("fixture job insert");
    }
    for candidate in candidates {
        store.candidate_insert(candidate).expect("fixture candidate insert");
    }
    store
}

/// A gateway with zero latency and the given failure policy - the shape
/// every deterministic test wants.
pub fn deterministic_gateway(
    store: Arc<InMemoryStore>,
    failures: Arc<dyn FailurePolicy>,
) -> SimulatedGateway<InMemoryStore> {
    SimulatedGateway::new(store)
        .with_latency(LatencyPolicy::None)
        .with_failure_policy(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_job_derives_unique_slugs() {
        let a = make_job("Rust Engineer", 1);
        let b = make_job("Rust Engineer", 2);
        assert_ne!(a.slug, b.slug);
        assert_eq!(a.order, 1);
    }

    #[test]
    fn test_make_candidate_sets_stage() {
        let candidate = make_candidate("Grace Hopper", Stage::Offer);
        assert_eq!(candidate.stage, Stage::Offer);
        assert!(candidate.email.contains("@example.com"));
    }

    #[test]
    fn test_store_with_populates_counts() {
        let jobs = vec![make_job("A", 1), make_job("B", 2)];
        let candidates = vec![make_candidate("C", Stage::Applied)];
        let store = store_with(&jobs, &candidates);
        assert_eq!(store.job_count(), 2);
        assert_eq!(store.candidate_count(), 1);
    }
}
