//! Deterministic seeding for tests and fixtures
//!
//! Mirrors the shape of the production seed data: sequentially ordered
//! active jobs plus candidates cycling through the pipeline stages. The
//! output depends only on the requested counts, so tests can assert against
//! stable titles and stages.

use crate::{InMemoryStore, RecordStore};
use talentflow_core::{Candidate, Job, Stage, TalentFlowResult};

const JOB_TITLES: [&str; 8] = [
    "Backend Engineer",
    "Frontend Engineer",
    "Platform Engineer",
    "Data Engineer",
    "Engineering Manager",
    "Product Designer",
    "QA Engineer",
    "Site Reliability Engineer",
];

/// Populate a store with `job_count` jobs and `candidate_count` candidates.
///
/// Jobs get orders `1..=job_count`; candidates cycle through `Stage::ALL`
/// and round-robin across the seeded jobs.
pub fn seed(store: &InMemoryStore, job_count: usize, candidate_count: usize) -> TalentFlowResult<()> {
    let mut jobs = Vec::with_capacity(job_count);
    for i in 0..job_count {
        let title = JOB_TITLES[i % JOB_TITLES.len()];
        let slug = format!("{}-{}", slugify(title), i + 1);
        let job = Job::new(format!("{} {}", title, i + 1), slug, (i + 1) as i64);
        store.job_insert(&job)?;
        jobs.push(job);
    }

    for i in 0..candidate_count {
        let stage = Stage::ALL[i % Stage::ALL.len()];
        let job_id = jobs.get(i % jobs.len().max(1)).map(|j| j.job_id);
        let mut candidate = Candidate::new(
            format!("Candidate {}", i + 1),
            format!("candidate{}@talentflow.dev", i + 1),
            job_id,
        );
        candidate.stage = stage;
        store.candidate_insert(&candidate)?;
    }

    Ok(())
}

fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentflow_core::{CandidateFilter, JobFilter};

    #[test]
    fn test_seed_assigns_sequential_orders() {
        let store = InMemoryStore::new();
        seed(&store, 5, 0).unwrap();

        let jobs = store.job_list(&JobFilter::all()).unwrap();
        let orders: Vec<i64> = jobs.iter().map(|j| j.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_seed_cycles_candidate_stages() {
        let store = InMemoryStore::new();
        seed(&store, 2, 12).unwrap();

        let candidates = store.candidate_list(&CandidateFilter::all()).unwrap();
        assert_eq!(candidates.len(), 12);
        // Two full cycles through the six stages.
        assert_eq!(
            candidates.iter().filter(|c| c.stage == Stage::Applied).count(),
            2
        );
    }

    #[test]
    fn test_seed_without_jobs_leaves_candidates_unassigned() {
        let store = InMemoryStore::new();
        seed(&store, 0, 3).unwrap();

        let candidates = store.candidate_list(&CandidateFilter::all()).unwrap();
        assert!(candidates.iter().all(|c| c.job_id.is_none()));
    }
}
