//! Simulated gateway over an in-process record store
//!
//! Applies the latency policy to every call and consults the failure policy
//! before every mutation. A successful stage change appends exactly one
//! timeline event; an injected failure leaves the store untouched.

use std::sync::Arc;

use async_trait::async_trait;
use talentflow_core::{
    Candidate, CandidateFilter, CandidateId, Job, JobFilter, JobId, NewJob, Stage, TimelineEvent,
};
use talentflow_store::{CandidateUpdate, JobUpdate, RecordStore};

use crate::policy::{FailurePolicy, GatewayOp, LatencyPolicy, RandomFailure};
use crate::{Gateway, GatewayError, GatewayResult};

/// Gateway simulation wrapping a [`RecordStore`].
///
/// The store is the durable source of truth; this type is the only path the
/// engine uses to reach it.
pub struct SimulatedGateway<S: RecordStore> {
    store: Arc<S>,
    latency: LatencyPolicy,
    failures: Arc<dyn FailurePolicy>,
}

impl<S: RecordStore> SimulatedGateway<S> {
    /// Production-shaped gateway: 200-1200ms latency, 5%/50% failure rates.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            latency: LatencyPolicy::simulated(),
            failures: Arc::new(RandomFailure::default()),
        }
    }

    /// Replace the latency policy.
    pub fn with_latency(mut self, latency: LatencyPolicy) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the failure policy.
    pub fn with_failure_policy(mut self, failures: Arc<dyn FailurePolicy>) -> Self {
        self.failures = failures;
        self
    }

    /// Direct handle to the wrapped store, for seeding and assertions.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Latency delay plus, for mutations, one failure-policy draw.
    async fn simulate(&self, op: GatewayOp) -> GatewayResult<()> {
        let delay = self.latency.draw();
        if !delay.is_zero() {
            tracing::trace!(op = %op, delay_ms = delay.as_millis() as u64, "gateway latency");
            tokio::time::sleep(delay).await;
        }
        if op.is_mutation() && self.failures.decide(op) {
            tracing::warn!(op = %op, "injected gateway failure");
            return Err(GatewayError::Injected {
                operation: op.describe().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<S: RecordStore> Gateway for SimulatedGateway<S> {
    async fn fetch_jobs(&self, filter: &JobFilter) -> GatewayResult<Vec<Job>> {
        self.simulate(GatewayOp::FetchJobs).await?;
        Ok(self.store.job_list(filter).map_err(flatten_store)?)
    }

    async fn fetch_candidates(&self, filter: &CandidateFilter) -> GatewayResult<Vec<Candidate>> {
        self.simulate(GatewayOp::FetchCandidates).await?;
        Ok(self.store.candidate_list(filter).map_err(flatten_store)?)
    }

    async fn create_job(&self, new_job: NewJob) -> GatewayResult<Job> {
        self.simulate(GatewayOp::CreateJob).await?;

        if new_job.title.trim().is_empty() {
            return Err(GatewayError::Rejected {
                reason: "Title is required".to_string(),
            });
        }
        let slug = if new_job.slug.trim().is_empty() {
            talentflow_core::new_entity_id().to_string()
        } else {
            new_job.slug.clone()
        };
        if self
            .store
            .job_find_by_slug(&slug)
            .map_err(flatten_store)?
            .is_some()
        {
            return Err(GatewayError::Rejected {
                reason: "Slug must be unique".to_string(),
            });
        }

        let order = self.store.job_max_order().map_err(flatten_store)? + 1;
        let mut job = Job::new(new_job.title, slug, order);
        job.tags = new_job.tags;
        self.store.job_insert(&job).map_err(flatten_store)?;
        tracing::debug!(job_id = %job.job_id, order, "job created");
        Ok(job)
    }

    async fn update_job(&self, id: JobId, update: JobUpdate) -> GatewayResult<Job> {
        self.simulate(GatewayOp::UpdateJob).await?;
        let job = self.store.job_update(id, update).map_err(flatten_store)?;
        tracing::debug!(job_id = %id, "job updated");
        Ok(job)
    }

    async fn update_candidate_stage(
        &self,
        id: CandidateId,
        to: Stage,
    ) -> GatewayResult<Candidate> {
        self.simulate(GatewayOp::UpdateCandidateStage).await?;

        let current = self
            .store
            .candidate_get(id)
            .map_err(flatten_store)?
            .ok_or(GatewayError::Rejected {
                reason: format!("Candidate {} does not exist", id),
            })?;
        let from = current.stage;

        let update = CandidateUpdate {
            stage: Some(to),
            ..CandidateUpdate::default()
        };
        let updated = self.store.candidate_update(id, update).map_err(flatten_store)?;
        // Side effect of a settled stage change: one append-only record.
        self.store
            .timeline_append(TimelineEvent::transition(id, from, to))
            .map_err(flatten_store)?;
        tracing::debug!(candidate_id = %id, from = %from, to = %to, "stage updated");
        Ok(updated)
    }

    async fn reorder_jobs(&self, ids_in_new_order: &[JobId]) -> GatewayResult<()> {
        self.simulate(GatewayOp::ReorderJobs).await?;

        let mut seen = std::collections::HashSet::with_capacity(ids_in_new_order.len());
        for id in ids_in_new_order {
            if !seen.insert(*id) {
                return Err(GatewayError::Rejected {
                    reason: format!("Duplicate job id {} in reorder", id),
                });
            }
        }

        let orders: Vec<(JobId, i64)> = ids_in_new_order
            .iter()
            .enumerate()
            .map(|(pos, id)| (*id, (pos + 1) as i64))
            .collect();
        self.store.job_set_orders(&orders).map_err(flatten_store)?;
        tracing::debug!(count = ids_in_new_order.len(), "jobs reordered");
        Ok(())
    }

    async fn timeline(&self, candidate_id: CandidateId) -> GatewayResult<Vec<TimelineEvent>> {
        self.simulate(GatewayOp::Timeline).await?;
        Ok(self.store.timeline_for(candidate_id).map_err(flatten_store)?)
    }
}

/// The store surfaces `TalentFlowResult`; fold its store variant into
/// `GatewayError` and treat anything else as a rejection.
fn flatten_store(err: talentflow_core::TalentFlowError) -> GatewayError {
    match err {
        talentflow_core::TalentFlowError::Store(e) => GatewayError::Store(e),
        other => GatewayError::Rejected {
            reason: other.to_string(),
        },
    }
}
