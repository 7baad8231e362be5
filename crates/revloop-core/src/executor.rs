//! Parallel execution of independent runs.
//!
//! Runs share no mutable state, so a batch can fan out freely. Each run
//! executes on the tokio blocking pool (the loop is synchronous) behind a
//! semaphore that caps concurrency. Reports come back in input order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{instrument, warn};

use crate::domain::{Result, RevloopError, SharedState};
use crate::engine::{Engine, RunReport};
use crate::metrics::METRICS;

/// Configuration for a batch of runs.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum number of runs executing at once. Zero is treated as one.
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// Run every state in `inputs` to termination with `engine`.
///
/// Returns [`RevloopError::BatchTask`] if a run's task panicked or was
/// cancelled; the remaining runs still complete before the error is returned.
#[instrument(skip_all, fields(runs = inputs.len(), max_concurrent = config.max_concurrent))]
pub async fn run_batch(
    engine: Engine,
    inputs: Vec<SharedState>,
    config: BatchConfig,
) -> Result<Vec<RunReport>> {
    let engine = Arc::new(engine);
    let sem = Arc::new(Semaphore::new(config.max_concurrent.max(1)));

    let mut tasks = Vec::with_capacity(inputs.len());
    for initial in inputs {
        let engine = Arc::clone(&engine);
        let sem = Arc::clone(&sem);

        tasks.push(tokio::spawn(async move {
            let _permit = sem.acquire_owned().await.ok();
            tokio::task::spawn_blocking(move || engine.run(initial)).await
        }));
    }

    let mut reports = Vec::with_capacity(tasks.len());
    let mut first_error: Option<RevloopError> = None;

    for (index, task) in tasks.into_iter().enumerate() {
        let outcome = match task.await {
            Ok(Ok(report)) => Ok(report),
            Ok(Err(e)) | Err(e) => Err(e),
        };
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(index = index, error = %e, "batch run failed");
                first_error.get_or_insert(RevloopError::BatchTask {
                    index,
                    detail: e.to_string(),
                });
            }
        }
    }

    METRICS.flush();

    match first_error {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoopConfig;
    use crate::engine::Termination;

    fn inputs() -> Vec<SharedState> {
        vec![
            SharedState::new("Understanding Caching Systems", "Caches store data."),
            SharedState::new("Forced", "Never accepted.").with_force_issue(true),
            SharedState::new("", ""),
        ]
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order() {
        let reports = run_batch(Engine::default(), inputs(), BatchConfig::default())
            .await
            .unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].final_state.title, "Understanding Caching Systems");
        assert_eq!(reports[1].termination, Termination::TurnCapReached);
        assert_eq!(reports[2].termination, Termination::Accepted);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_completes() {
        let engine = Engine::new(LoopConfig::default().with_max_turns(3));
        let reports = run_batch(engine, inputs(), BatchConfig { max_concurrent: 0 })
            .await
            .unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[1].final_state.turn_count, 3);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let reports = run_batch(Engine::default(), vec![], BatchConfig::default())
            .await
            .unwrap();
        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn test_runs_get_distinct_ids() {
        let reports = run_batch(Engine::default(), inputs(), BatchConfig::default())
            .await
            .unwrap();
        assert_ne!(reports[0].run_id, reports[1].run_id);
        assert_ne!(reports[1].run_id, reports[2].run_id);
    }
}
