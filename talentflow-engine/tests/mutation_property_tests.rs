//! Property tests for the mutation engine invariants: rollback exactness,
//! order totality after a settled reorder, and timeline growth bounded by
//! settled stage changes.

use std::sync::Arc;

use proptest::prelude::*;
use tokio::runtime::Runtime;

use talentflow_core::{CandidateFilter, CandidateIntent, JobFilter, JobIntent, Stage};
use talentflow_engine::{MutationEngine, QueryCache};
use talentflow_gateway::{AlwaysFail, AlwaysSucceed, FailOnNth, FailurePolicy, SimulatedGateway};
use talentflow_store::InMemoryStore;
use talentflow_test_utils::{deterministic_gateway, make_candidate, make_job, store_with};

type TestEngine = MutationEngine<SimulatedGateway<InMemoryStore>>;

fn engine_with(
    store: Arc<InMemoryStore>,
    failures: Arc<dyn FailurePolicy>,
) -> (TestEngine, Arc<QueryCache>) {
    let cache = Arc::new(QueryCache::new());
    let gateway = Arc::new(deterministic_gateway(store, failures));
    (MutationEngine::new(gateway, cache.clone()), cache)
}

/// A permutation of 0..n derived from arbitrary sort keys.
fn permutation(n: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(any::<u64>(), n).prop_map(|keys| {
        let mut indices: Vec<usize> = (0..keys.len()).collect();
        indices.sort_by_key(|&i| (keys[i], i));
        indices
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_failed_reorder_restores_exact_snapshot(
        (count, perm) in (1usize..8).prop_flat_map(|n| (Just(n), permutation(n))),
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let jobs: Vec<_> = (0..count)
                .map(|i| make_job(&format!("Job {}", i), (i + 1) as i64))
                .collect();
            let store = store_with(&jobs, &[]);
            let (engine, cache) = engine_with(store, Arc::new(AlwaysFail));

            let filter = JobFilter::all();
            engine.refresh_jobs(&filter).await.unwrap();
            let before = cache.jobs().get(&filter).unwrap();

            let ids: Vec<_> = perm.iter().map(|&i| jobs[i].job_id).collect();

            let outcome = engine
                .apply_job_mutation(&filter, JobIntent::Reorder { ids_in_new_order: ids })
                .await
                .unwrap();

            prop_assert!(outcome.is_rolled_back());
            prop_assert_eq!(cache.jobs().get(&filter).unwrap(), before);
            Ok(())
        })?;
    }

    #[test]
    fn prop_settled_reorder_yields_total_one_based_orders(
        (count, perm) in (1usize..8).prop_flat_map(|n| (Just(n), permutation(n))),
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let jobs: Vec<_> = (0..count)
                .map(|i| make_job(&format!("Job {}", i), (i + 1) as i64))
                .collect();
            let store = store_with(&jobs, &[]);
            let (engine, cache) = engine_with(store, Arc::new(AlwaysSucceed));

            let filter = JobFilter::all();
            engine.refresh_jobs(&filter).await.unwrap();

            let ids: Vec<_> = perm.iter().map(|&i| jobs[i].job_id).collect();
            let outcome = engine
                .apply_job_mutation(
                    &filter,
                    JobIntent::Reorder { ids_in_new_order: ids.clone() },
                )
                .await
                .unwrap();
            prop_assert!(outcome.is_settled());

            // Orders are exactly 1..=count with no gaps or duplicates, and
            // the sequence matches the requested permutation.
            let entry = cache.jobs().get(&filter).unwrap();
            let orders: Vec<i64> = entry.records.iter().map(|j| j.order).collect();
            prop_assert_eq!(orders, (1..=count as i64).collect::<Vec<_>>());
            prop_assert_eq!(entry.ids(), ids);
            Ok(())
        })?;
    }

    #[test]
    fn prop_timeline_grows_only_with_settled_stage_changes(
        fail_on in 1u64..6,
        attempts in 1usize..6,
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let candidate = make_candidate("Walker", Stage::Applied);
            let store = store_with(&[], &[candidate.clone()]);
            let (engine, cache) =
                engine_with(store.clone(), Arc::new(FailOnNth::new(fail_on)));

            let filter = CandidateFilter::all();
            engine.refresh_candidates(&filter).await.unwrap();

            let path = [Stage::Screen, Stage::Tech, Stage::Offer, Stage::Hired];
            let mut settled = 0usize;
            let mut stage = Stage::Applied;
            for next in path.iter().take(attempts) {
                let outcome = engine
                    .apply_candidate_mutation(
                        &filter,
                        CandidateIntent::StageChange {
                            candidate_id: candidate.candidate_id,
                            from: stage,
                            to: *next,
                        },
                    )
                    .await
                    .unwrap();
                if outcome.is_settled() {
                    settled += 1;
                    stage = *next;
                }
            }

            prop_assert_eq!(store.timeline_count(), settled);
            let entry = cache.candidates().get(&filter).unwrap();
            prop_assert_eq!(entry.find(candidate.candidate_id).unwrap().stage, stage);
            Ok(())
        })?;
    }
}
