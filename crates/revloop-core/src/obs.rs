//! Structured observability hooks for the run lifecycle.
//!
//! - Run-scoped tracing spans via the [`RunSpan`] RAII guard
//! - Emission functions for run start, role invocation, routing and finish
//!
//! Lifecycle events are emitted at `info!`, per-step events at `debug!`.
//! Formatting is left to the subscriber installed by
//! [`init_tracing`](crate::telemetry::init_tracing).

use tracing::{debug, info};

use crate::domain::StateKey;
use crate::roles::Role;
use crate::router::Route;

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
///
/// ```ignore
/// let _span = RunSpan::enter("7f1c...");
/// // every event below carries run_id = "7f1c..."
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("revloop.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_run_started(run_id: &str, max_turns: u32, policy: &str) {
    info!(event = "run.started", run_id = %run_id, max_turns = max_turns, policy = %policy);
}

/// Emit event: a role was invoked and its delta merged.
pub fn emit_role_invoked(
    run_id: &str,
    step: usize,
    role: Role,
    modified: &[StateKey],
    turn_count: u32,
) {
    let keys = modified
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    debug!(
        event = "role.invoked",
        run_id = %run_id,
        step = step,
        role = %role,
        modified = %keys,
        turn_count = turn_count,
    );
}

/// Emit event: the router picked the next hop after a supervisor turn.
pub fn emit_route_decided(run_id: &str, turn_count: u32, route: Route) {
    debug!(event = "route.decided", run_id = %run_id, turn_count = turn_count, route = %route);
}

/// Emit event: run finished with its terminal disposition.
pub fn emit_run_finished(
    run_id: &str,
    duration_ms: u64,
    turn_count: u32,
    accepted: bool,
    termination: &str,
) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        turn_count = turn_count,
        accepted = accepted,
        termination = %termination,
    );
}

/// Emit event: the engine's step ceiling stopped a run (error level).
pub fn emit_step_ceiling_hit(run_id: &str, ceiling: usize) {
    tracing::error!(event = "run.step_ceiling_hit", run_id = %run_id, ceiling = ceiling);
}

/// Emit event: the replayed journal disagreed with the live state (warn level).
pub fn emit_materialize_mismatch(run_id: &str) {
    tracing::warn!(event = "run.materialize_mismatch", run_id = %run_id);
}
