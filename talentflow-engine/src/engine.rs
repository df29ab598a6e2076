//! Optimistic mutation engine
//!
//! Orchestrates one mutation attempt end to end: acquire the per-key lock,
//! snapshot the cache entry, install the speculative value, dispatch to the
//! gateway, then settle (with a reconciliation read) or restore the exact
//! snapshot. Once an attempt finishes, the visible entry equals either the
//! intended new state or the pre-mutation state - never a blend.
//!
//! Serialization rule: at most one outstanding mutation owns a key's
//! rollback snapshot. A second mutation against the same key queues behind
//! the first's lock, so its snapshot always reflects the state after the
//! first settled or rolled back. Refreshes take the same lock, so a stale
//! read can never land between snapshot and speculative write.

use std::collections::HashSet;
use std::sync::Arc;

use talentflow_core::{
    new_entity_id, Candidate, CandidateFilter, CandidateIntent, Collection, EngineError, Job,
    JobFilter, JobIntent, TalentFlowResult,
};
use talentflow_gateway::Gateway;
use talentflow_store::JobUpdate;

use crate::cache::{CacheEntry, QueryCache};
use crate::outcome::{MutationOutcome, MutationPhase};

/// The optimistic mutation engine.
///
/// Holds the gateway it dispatches through and the explicit cache handle it
/// speculates into. Cheap to share: wrap in `Arc` and clone the handle.
pub struct MutationEngine<G: Gateway> {
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G: Gateway> MutationEngine<G> {
    /// Create an engine over an explicit cache handle.
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    /// The cache handle, for render-side reads.
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// The gateway handle.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    // ========================================================================
    // READ PATH
    // ========================================================================

    /// Populate or refresh the cached jobs entry for a filter.
    ///
    /// Takes the same per-key lock as mutations, so a refresh can never
    /// overwrite an in-flight speculative write.
    pub async fn refresh_jobs(&self, filter: &JobFilter) -> TalentFlowResult<Vec<Job>> {
        let lock = self.cache.jobs().key_lock(filter);
        let _guard = lock.lock_owned().await;
        let records = self.gateway.fetch_jobs(filter).await?;
        self.cache
            .jobs()
            .set(filter.clone(), CacheEntry::confirmed(records.clone()));
        tracing::debug!(key = %filter, count = records.len(), "jobs cache refreshed");
        Ok(records)
    }

    /// Populate or refresh the cached candidates entry for a filter.
    pub async fn refresh_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> TalentFlowResult<Vec<Candidate>> {
        let lock = self.cache.candidates().key_lock(filter);
        let _guard = lock.lock_owned().await;
        let records = self.gateway.fetch_candidates(filter).await?;
        self.cache
            .candidates()
            .set(filter.clone(), CacheEntry::confirmed(records.clone()));
        tracing::debug!(key = %filter, count = records.len(), "candidates cache refreshed");
        Ok(records)
    }

    // ========================================================================
    // MUTATION PATH: CANDIDATES
    // ========================================================================

    /// Apply a candidate mutation optimistically against the entry for
    /// `filter`.
    ///
    /// Returns `Err` only for logic errors (intent contradicts the cached
    /// snapshot). Gateway failures resolve to
    /// [`MutationOutcome::RolledBack`].
    pub async fn apply_candidate_mutation(
        &self,
        filter: &CandidateFilter,
        intent: CandidateIntent,
    ) -> TalentFlowResult<MutationOutcome<Candidate>> {
        let attempt = new_entity_id();
        let operation = intent.describe();

        let lock = self.cache.candidates().key_lock(filter);
        let _guard = lock.lock_owned().await;

        // Rollback target: the entry as of lock acquisition.
        let snapshot = self
            .cache
            .candidates()
            .get(filter)
            .unwrap_or_else(CacheEntry::empty);

        let CandidateIntent::StageChange {
            candidate_id,
            from,
            to,
        } = intent;

        if from == to {
            return Err(EngineError::EmptyIntent.into());
        }
        let current = snapshot
            .find(candidate_id)
            .ok_or(EngineError::RecordNotInSnapshot {
                collection: Collection::Candidates,
                id: candidate_id,
            })?;
        if current.stage != from {
            return Err(EngineError::StageMismatch {
                candidate_id,
                expected: from,
                found: current.stage,
            }
            .into());
        }

        tracing::debug!(
            %attempt, key = %filter, candidate = %candidate_id,
            phase = %MutationPhase::Speculating, %from, %to,
            "applying stage change"
        );
        let mut speculative = snapshot.records.clone();
        for candidate in &mut speculative {
            if candidate.candidate_id == candidate_id {
                candidate.stage = to;
            }
        }
        self.cache
            .candidates()
            .set(filter.clone(), CacheEntry::speculative(speculative));

        tracing::debug!(%attempt, key = %filter, phase = %MutationPhase::AwaitingServer, "dispatched");
        match self.gateway.update_candidate_stage(candidate_id, to).await {
            Ok(_confirmed) => {
                tracing::debug!(%attempt, key = %filter, phase = %MutationPhase::Settled, "settled");
                let records = self.reconcile_candidates(filter).await;
                Ok(MutationOutcome::Settled { records })
            }
            Err(err) => {
                tracing::warn!(
                    %attempt, key = %filter, phase = %MutationPhase::RolledBack,
                    error = %err, "rolling back stage change"
                );
                self.cache.candidates().set(filter.clone(), snapshot);
                Ok(MutationOutcome::RolledBack {
                    operation,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Post-settle reconciliation read. Advisory: a fetch error keeps the
    /// already-settled optimistic entry and promotes it to confirmed.
    async fn reconcile_candidates(&self, filter: &CandidateFilter) -> Vec<Candidate> {
        match self.gateway.fetch_candidates(filter).await {
            Ok(fresh) => {
                self.cache
                    .candidates()
                    .set(filter.clone(), CacheEntry::confirmed(fresh.clone()));
                fresh
            }
            Err(err) => {
                tracing::warn!(key = %filter, error = %err, "reconciliation fetch failed");
                self.cache.candidates().confirm(filter);
                self.cache
                    .candidates()
                    .get(filter)
                    .map(|entry| entry.records)
                    .unwrap_or_default()
            }
        }
    }

    // ========================================================================
    // MUTATION PATH: JOBS
    // ========================================================================

    /// Apply a job mutation optimistically against the entry for `filter`.
    pub async fn apply_job_mutation(
        &self,
        filter: &JobFilter,
        intent: JobIntent,
    ) -> TalentFlowResult<MutationOutcome<Job>> {
        let attempt = new_entity_id();
        let operation = intent.describe();

        let lock = self.cache.jobs().key_lock(filter);
        let _guard = lock.lock_owned().await;

        let snapshot = self.cache.jobs().get(filter).unwrap_or_else(CacheEntry::empty);

        match intent {
            JobIntent::Reorder { ids_in_new_order } => {
                let speculative = resequence(&snapshot, &ids_in_new_order)?;
                tracing::debug!(
                    %attempt, key = %filter, phase = %MutationPhase::Speculating,
                    count = ids_in_new_order.len(), "applying reorder"
                );
                self.cache
                    .jobs()
                    .set(filter.clone(), CacheEntry::speculative(speculative));

                tracing::debug!(%attempt, key = %filter, phase = %MutationPhase::AwaitingServer, "dispatched");
                match self.gateway.reorder_jobs(&ids_in_new_order).await {
                    Ok(()) => {
                        tracing::debug!(%attempt, key = %filter, phase = %MutationPhase::Settled, "settled");
                        let records = self.reconcile_jobs(filter).await;
                        Ok(MutationOutcome::Settled { records })
                    }
                    Err(err) => {
                        tracing::warn!(
                            %attempt, key = %filter, phase = %MutationPhase::RolledBack,
                            error = %err, "rolling back reorder"
                        );
                        self.cache.jobs().set(filter.clone(), snapshot);
                        Ok(MutationOutcome::RolledBack {
                            operation,
                            reason: err.to_string(),
                        })
                    }
                }
            }
            JobIntent::Edit { job_id, edit } => {
                if edit.is_empty() {
                    return Err(EngineError::EmptyIntent.into());
                }
                if snapshot.find(job_id).is_none() {
                    return Err(EngineError::RecordNotInSnapshot {
                        collection: Collection::Jobs,
                        id: job_id,
                    }
                    .into());
                }

                tracing::debug!(
                    %attempt, key = %filter, job = %job_id,
                    phase = %MutationPhase::Speculating, "applying job edit"
                );
                let mut speculative = snapshot.records.clone();
                for job in &mut speculative {
                    if job.job_id == job_id {
                        if let Some(title) = &edit.title {
                            job.title = title.clone();
                        }
                        if let Some(slug) = &edit.slug {
                            job.slug = slug.clone();
                        }
                        if let Some(status) = edit.status {
                            job.status = status;
                        }
                        if let Some(tags) = &edit.tags {
                            job.tags = tags.clone();
                        }
                    }
                }
                self.cache
                    .jobs()
                    .set(filter.clone(), CacheEntry::speculative(speculative));

                let update = JobUpdate {
                    title: edit.title,
                    slug: edit.slug,
                    status: edit.status,
                    tags: edit.tags,
                };
                tracing::debug!(%attempt, key = %filter, phase = %MutationPhase::AwaitingServer, "dispatched");
                match self.gateway.update_job(job_id, update).await {
                    Ok(_confirmed) => {
                        tracing::debug!(%attempt, key = %filter, phase = %MutationPhase::Settled, "settled");
                        let records = self.reconcile_jobs(filter).await;
                        Ok(MutationOutcome::Settled { records })
                    }
                    Err(err) => {
                        tracing::warn!(
                            %attempt, key = %filter, phase = %MutationPhase::RolledBack,
                            error = %err, "rolling back job edit"
                        );
                        self.cache.jobs().set(filter.clone(), snapshot);
                        Ok(MutationOutcome::RolledBack {
                            operation,
                            reason: err.to_string(),
                        })
                    }
                }
            }
        }
    }

    /// Post-settle reconciliation read for the jobs collection.
    async fn reconcile_jobs(&self, filter: &JobFilter) -> Vec<Job> {
        match self.gateway.fetch_jobs(filter).await {
            Ok(fresh) => {
                self.cache
                    .jobs()
                    .set(filter.clone(), CacheEntry::confirmed(fresh.clone()));
                fresh
            }
            Err(err) => {
                tracing::warn!(key = %filter, error = %err, "reconciliation fetch failed");
                self.cache.jobs().confirm(filter);
                self.cache
                    .jobs()
                    .get(filter)
                    .map(|entry| entry.records)
                    .unwrap_or_default()
            }
        }
    }
}

/// Build the speculative sequence for a reorder: the snapshot's records in
/// the requested order, each `order` field rewritten to its 1-based
/// position.
///
/// The id list must be exactly a permutation of the snapshot's ids.
fn resequence(snapshot: &CacheEntry<Job>, ids_in_new_order: &[uuid::Uuid]) -> Result<Vec<Job>, EngineError> {
    if ids_in_new_order.len() != snapshot.records.len() {
        return Err(EngineError::ReorderMismatch {
            reason: format!(
                "{} ids supplied for {} cached jobs",
                ids_in_new_order.len(),
                snapshot.records.len()
            ),
        });
    }
    let mut seen = HashSet::with_capacity(ids_in_new_order.len());
    let mut resequenced = Vec::with_capacity(ids_in_new_order.len());
    for (position, id) in ids_in_new_order.iter().enumerate() {
        if !seen.insert(*id) {
            return Err(EngineError::ReorderMismatch {
                reason: format!("duplicate id {}", id),
            });
        }
        let mut job = snapshot
            .find(*id)
            .ok_or_else(|| EngineError::ReorderMismatch {
                reason: format!("id {} is not in the cached snapshot", id),
            })?
            .clone();
        job.order = (position + 1) as i64;
        resequenced.push(job);
    }
    Ok(resequenced)
}
