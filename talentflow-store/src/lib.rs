//! TalentFlow Store - Record Store Trait and In-Memory Implementation
//!
//! Defines the durable-source-of-truth abstraction the gateway writes
//! through. The store serializes its own writes: bulk order reassignment
//! happens under one write lock, so readers never observe a partial reorder.
//! The timeline is append-only - there is no update or delete surface for it.

pub mod seed;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use talentflow_core::{
    Candidate, CandidateFilter, CandidateId, Collection, Job, JobFilter, JobId, JobStatus, Stage,
    StoreError, TalentFlowResult, TimelineEvent,
};

// ============================================================================
// UPDATE TYPES
// ============================================================================

/// Update payload for jobs. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<JobStatus>,
    pub tags: Option<Vec<String>>,
}

/// Update payload for candidates. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub stage: Option<Stage>,
    pub job_id: Option<Option<JobId>>,
}

// ============================================================================
// RECORD STORE TRAIT
// ============================================================================

/// Key-addressed persistent collections for jobs and candidates.
///
/// Reached only through the network gateway from the engine's point of view.
/// Implementations must serialize their own writes.
pub trait RecordStore: Send + Sync {
    // === Job Operations ===

    /// Insert a new job. Fails on duplicate id or duplicate slug.
    fn job_insert(&self, job: &Job) -> TalentFlowResult<()>;

    /// Get a job by id.
    fn job_get(&self, id: JobId) -> TalentFlowResult<Option<Job>>;

    /// Update a job's fields.
    fn job_update(&self, id: JobId, update: JobUpdate) -> TalentFlowResult<Job>;

    /// Ordered scan: jobs matching the filter, sorted by `order`.
    fn job_list(&self, filter: &JobFilter) -> TalentFlowResult<Vec<Job>>;

    /// Reassign `order` for every listed job in one atomic write.
    ///
    /// Readers never observe a partially applied reorder.
    fn job_set_orders(&self, orders: &[(JobId, i64)]) -> TalentFlowResult<()>;

    /// Highest `order` currently assigned, or 0 for an empty collection.
    fn job_max_order(&self) -> TalentFlowResult<i64>;

    /// Look up a job by its unique slug.
    fn job_find_by_slug(&self, slug: &str) -> TalentFlowResult<Option<Job>>;

    // === Candidate Operations ===

    /// Insert a new candidate.
    fn candidate_insert(&self, candidate: &Candidate) -> TalentFlowResult<()>;

    /// Get a candidate by id.
    fn candidate_get(&self, id: CandidateId) -> TalentFlowResult<Option<Candidate>>;

    /// Update a candidate's fields.
    fn candidate_update(&self, id: CandidateId, update: CandidateUpdate)
        -> TalentFlowResult<Candidate>;

    /// Ordered scan: candidates matching the filter, sorted by creation time
    /// then id for a stable order.
    fn candidate_list(&self, filter: &CandidateFilter) -> TalentFlowResult<Vec<Candidate>>;

    // === Timeline Operations (append-only) ===

    /// Append one timeline event. Events are never rewritten or deleted.
    fn timeline_append(&self, event: TimelineEvent) -> TalentFlowResult<()>;

    /// All timeline events for a candidate, ordered by occurrence.
    fn timeline_for(&self, candidate_id: CandidateId) -> TalentFlowResult<Vec<TimelineEvent>>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory record store backing the simulated gateway and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
    candidates: Arc<RwLock<HashMap<CandidateId, Candidate>>>,
    timeline: Arc<RwLock<Vec<TimelineEvent>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.jobs.write().unwrap().clear();
        self.candidates.write().unwrap().clear();
        self.timeline.write().unwrap().clear();
    }

    /// Get count of stored jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    /// Get count of stored candidates.
    pub fn candidate_count(&self) -> usize {
        self.candidates.read().unwrap().len()
    }

    /// Get count of timeline events across all candidates.
    pub fn timeline_count(&self) -> usize {
        self.timeline.read().unwrap().len()
    }
}

impl RecordStore for InMemoryStore {
    // === Job Operations ===

    fn job_insert(&self, job: &Job) -> TalentFlowResult<()> {
        let mut jobs = self.jobs.write().unwrap();
        if jobs.contains_key(&job.job_id) {
            return Err(StoreError::InsertFailed {
                collection: Collection::Jobs,
                reason: "already exists".to_string(),
            }
            .into());
        }
        if jobs.values().any(|j| j.slug == job.slug) {
            return Err(StoreError::InsertFailed {
                collection: Collection::Jobs,
                reason: format!("slug '{}' already taken", job.slug),
            }
            .into());
        }
        jobs.insert(job.job_id, job.clone());
        Ok(())
    }

    fn job_get(&self, id: JobId) -> TalentFlowResult<Option<Job>> {
        let jobs = self.jobs.read().unwrap();
        Ok(jobs.get(&id).cloned())
    }

    fn job_update(&self, id: JobId, update: JobUpdate) -> TalentFlowResult<Job> {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(slug) = &update.slug {
            if jobs.values().any(|j| j.job_id != id && &j.slug == slug) {
                return Err(StoreError::UpdateFailed {
                    collection: Collection::Jobs,
                    id,
                    reason: format!("slug '{}' already taken", slug),
                }
                .into());
            }
        }
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound {
            collection: Collection::Jobs,
            id,
        })?;

        if let Some(title) = update.title {
            job.title = title;
        }
        if let Some(slug) = update.slug {
            job.slug = slug;
        }
        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(tags) = update.tags {
            job.tags = tags;
        }
        job.updated_at = chrono::Utc::now();

        Ok(job.clone())
    }

    fn job_list(&self, filter: &JobFilter) -> TalentFlowResult<Vec<Job>> {
        let jobs = self.jobs.read().unwrap();
        let mut matched: Vec<Job> = jobs.values().filter(|j| filter.matches(j)).cloned().collect();
        matched.sort_by_key(|j| j.order);
        Ok(matched)
    }

    fn job_set_orders(&self, orders: &[(JobId, i64)]) -> TalentFlowResult<()> {
        let mut jobs = self.jobs.write().unwrap();
        // Validate before touching anything so the bulk write is all-or-nothing.
        for (id, _) in orders {
            if !jobs.contains_key(id) {
                return Err(StoreError::NotFound {
                    collection: Collection::Jobs,
                    id: *id,
                }
                .into());
            }
        }
        let now = chrono::Utc::now();
        for (id, order) in orders {
            if let Some(job) = jobs.get_mut(id) {
                job.order = *order;
                job.updated_at = now;
            }
        }
        Ok(())
    }

    fn job_max_order(&self) -> TalentFlowResult<i64> {
        let jobs = self.jobs.read().unwrap();
        Ok(jobs.values().map(|j| j.order).max().unwrap_or(0))
    }

    fn job_find_by_slug(&self, slug: &str) -> TalentFlowResult<Option<Job>> {
        let jobs = self.jobs.read().unwrap();
        Ok(jobs.values().find(|j| j.slug == slug).cloned())
    }

    // === Candidate Operations ===

    fn candidate_insert(&self, candidate: &Candidate) -> TalentFlowResult<()> {
        let mut candidates = self.candidates.write().unwrap();
        if candidates.contains_key(&candidate.candidate_id) {
            return Err(StoreError::InsertFailed {
                collection: Collection::Candidates,
                reason: "already exists".to_string(),
            }
            .into());
        }
        candidates.insert(candidate.candidate_id, candidate.clone());
        Ok(())
    }

    fn candidate_get(&self, id: CandidateId) -> TalentFlowResult<Option<Candidate>> {
        let candidates = self.candidates.read().unwrap();
        Ok(candidates.get(&id).cloned())
    }

    fn candidate_update(
        &self,
        id: CandidateId,
        update: CandidateUpdate,
    ) -> TalentFlowResult<Candidate> {
        let mut candidates = self.candidates.write().unwrap();
        let candidate = candidates.get_mut(&id).ok_or(StoreError::NotFound {
            collection: Collection::Candidates,
            id,
        })?;

        if let Some(name) = update.name {
            candidate.name = name;
        }
        if let Some(email) = update.email {
            candidate.email = email;
        }
        if let Some(stage) = update.stage {
            candidate.stage = stage;
        }
        if let Some(job_id) = update.job_id {
            candidate.job_id = job_id;
        }
        candidate.updated_at = chrono::Utc::now();

        Ok(candidate.clone())
    }

    fn candidate_list(&self, filter: &CandidateFilter) -> TalentFlowResult<Vec<Candidate>> {
        let candidates = self.candidates.read().unwrap();
        let mut matched: Vec<Candidate> = candidates
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.candidate_id.cmp(&b.candidate_id))
        });
        Ok(matched)
    }

    // === Timeline Operations ===

    fn timeline_append(&self, event: TimelineEvent) -> TalentFlowResult<()> {
        let mut timeline = self.timeline.write().unwrap();
        timeline.push(event);
        Ok(())
    }

    fn timeline_for(&self, candidate_id: CandidateId) -> TalentFlowResult<Vec<TimelineEvent>> {
        let timeline = self.timeline.read().unwrap();
        let mut events: Vec<TimelineEvent> = timeline
            .iter()
            .filter(|e| e.candidate_id == candidate_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at).then(a.event_id.cmp(&b.event_id)));
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job(title: &str, slug: &str, order: i64) -> Job {
        Job::new(title, slug, order)
    }

    #[test]
    fn test_job_insert_and_get() {
        let store = InMemoryStore::new();
        let job = make_job("Backend Engineer", "backend", 1);
        store.job_insert(&job).unwrap();

        let found = store.job_get(job.job_id).unwrap().unwrap();
        assert_eq!(found, job);
    }

    #[test]
    fn test_job_insert_rejects_duplicate_slug() {
        let store = InMemoryStore::new();
        store.job_insert(&make_job("A", "same-slug", 1)).unwrap();
        let err = store.job_insert(&make_job("B", "same-slug", 2)).unwrap_err();
        assert!(err.to_string().contains("slug"));
    }

    #[test]
    fn test_job_update_rejects_taken_slug() {
        let store = InMemoryStore::new();
        let a = make_job("A", "slug-a", 1);
        let b = make_job("B", "slug-b", 2);
        store.job_insert(&a).unwrap();
        store.job_insert(&b).unwrap();

        let update = JobUpdate {
            slug: Some("slug-a".to_string()),
            ..JobUpdate::default()
        };
        assert!(store.job_update(b.job_id, update).is_err());
    }

    #[test]
    fn test_job_list_filters_and_sorts_by_order() {
        let store = InMemoryStore::new();
        let mut archived = make_job("Old Role", "old-role", 1);
        archived.status = JobStatus::Archived;
        store.job_insert(&archived).unwrap();
        store.job_insert(&make_job("Data Engineer", "data", 3)).unwrap();
        store.job_insert(&make_job("Rust Engineer", "rust", 2)).unwrap();

        let active = store
            .job_list(&JobFilter::all().with_status(JobStatus::Active))
            .unwrap();
        let titles: Vec<&str> = active.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Rust Engineer", "Data Engineer"]);
    }

    #[test]
    fn test_job_set_orders_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let a = make_job("A", "a", 1);
        let b = make_job("B", "b", 2);
        store.job_insert(&a).unwrap();
        store.job_insert(&b).unwrap();

        // One unknown id poisons the whole batch.
        let unknown = uuid::Uuid::now_v7();
        let result = store.job_set_orders(&[(b.job_id, 1), (unknown, 2)]);
        assert!(result.is_err());
        assert_eq!(store.job_get(b.job_id).unwrap().unwrap().order, 2);

        store.job_set_orders(&[(b.job_id, 1), (a.job_id, 2)]).unwrap();
        assert_eq!(store.job_get(b.job_id).unwrap().unwrap().order, 1);
        assert_eq!(store.job_get(a.job_id).unwrap().unwrap().order, 2);
    }

    #[test]
    fn test_job_max_order_empty_is_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.job_max_order().unwrap(), 0);
        store.job_insert(&make_job("A", "a", 7)).unwrap();
        assert_eq!(store.job_max_order().unwrap(), 7);
    }

    #[test]
    fn test_candidate_update_changes_stage() {
        let store = InMemoryStore::new();
        let candidate = Candidate::new("Ada", "ada@example.com", None);
        store.candidate_insert(&candidate).unwrap();

        let update = CandidateUpdate {
            stage: Some(Stage::Screen),
            ..CandidateUpdate::default()
        };
        let updated = store.candidate_update(candidate.candidate_id, update).unwrap();
        assert_eq!(updated.stage, Stage::Screen);
        assert_eq!(updated.name, "Ada");
    }

    #[test]
    fn test_candidate_list_is_stable() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            let c = Candidate::new(format!("c{}", i), format!("c{}@x.com", i), None);
            store.candidate_insert(&c).unwrap();
        }
        let first = store.candidate_list(&CandidateFilter::all()).unwrap();
        let second = store.candidate_list(&CandidateFilter::all()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_timeline_append_and_order() {
        let store = InMemoryStore::new();
        let candidate = Candidate::new("Ada", "ada@example.com", None);
        store.candidate_insert(&candidate).unwrap();

        let first = TimelineEvent::transition(candidate.candidate_id, Stage::Applied, Stage::Screen);
        let second = TimelineEvent::transition(candidate.candidate_id, Stage::Screen, Stage::Tech);
        store.timeline_append(first.clone()).unwrap();
        store.timeline_append(second.clone()).unwrap();

        let events = store.timeline_for(candidate.candidate_id).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_id, first.event_id);
        assert_eq!(events[1].event_id, second.event_id);
    }

    proptest::proptest! {
        #[test]
        fn prop_set_orders_applies_every_rank(count in 1usize..12) {
            let store = InMemoryStore::new();
            let mut ids = Vec::new();
            for i in 0..count {
                let job = make_job(&format!("Job {}", i), &format!("job-{}", i), (i + 1) as i64);
                store.job_insert(&job).unwrap();
                ids.push(job.job_id);
            }

            // Reverse the list and reassign 1-based ranks.
            ids.reverse();
            let orders: Vec<(uuid::Uuid, i64)> = ids
                .iter()
                .enumerate()
                .map(|(pos, id)| (*id, (pos + 1) as i64))
                .collect();
            store.job_set_orders(&orders).unwrap();

            let listed = store.job_list(&JobFilter::all()).unwrap();
            let listed_ids: Vec<uuid::Uuid> = listed.iter().map(|j| j.job_id).collect();
            proptest::prop_assert_eq!(listed_ids, ids);
            let ranks: Vec<i64> = listed.iter().map(|j| j.order).collect();
            proptest::prop_assert_eq!(ranks, (1..=count as i64).collect::<Vec<i64>>());
        }
    }

    #[test]
    fn test_timeline_is_scoped_per_candidate() {
        let store = InMemoryStore::new();
        let a = Candidate::new("A", "a@x.com", None);
        let b = Candidate::new("B", "b@x.com", None);
        store.candidate_insert(&a).unwrap();
        store.candidate_insert(&b).unwrap();

        store
            .timeline_append(TimelineEvent::transition(a.candidate_id, Stage::Applied, Stage::Screen))
            .unwrap();

        assert_eq!(store.timeline_for(a.candidate_id).unwrap().len(), 1);
        assert!(store.timeline_for(b.candidate_id).unwrap().is_empty());
    }
}
