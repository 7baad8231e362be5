//! The revision loop engine.
//!
//! A run is a small state machine over [`EngineState`]:
//!
//! ```text
//! Supervisor --route--> Planner  --> Supervisor
//!            --route--> Reviewer --> Supervisor
//!            --route--> Terminated
//! ```
//!
//! Each step invokes the role bound to the current state, merges its delta,
//! records the delta in a journal and publishes a [`TraceEvent`]. Planner and
//! reviewer always hand back to the supervisor; only the supervisor step
//! consults the router, and it does so against the post-merge state. When the
//! router says terminate, the final state is rebuilt from the journal and
//! returned in a [`RunReport`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::config::LoopConfig;
use crate::domain::{SharedState, StateDelta};
use crate::merge::{materialize, merge};
use crate::metrics::METRICS;
use crate::obs::{
    emit_materialize_mismatch, emit_role_invoked, emit_route_decided, emit_run_finished,
    emit_run_started, emit_step_ceiling_hit, RunSpan,
};
use crate::roles::{ReviewPolicy, Role};
use crate::router::{route, Route};
use crate::trace::{NoopObserver, TraceEvent, TraceObserver};

/// States of the engine's control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Supervisor,
    Planner,
    Reviewer,
    Terminated,
}

impl EngineState {
    /// Role bound to this state, `None` once terminated.
    pub fn role(self) -> Option<Role> {
        match self {
            EngineState::Supervisor => Some(Role::Supervisor),
            EngineState::Planner => Some(Role::Planner),
            EngineState::Reviewer => Some(Role::Reviewer),
            EngineState::Terminated => None,
        }
    }

    fn after_route(route: Route) -> Self {
        match route {
            Route::Planner => EngineState::Planner,
            Route::Reviewer => EngineState::Reviewer,
            Route::Terminate => EngineState::Terminated,
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The reviewer accepted the latest proposal.
    Accepted,
    /// The turn cap was reached with issues still outstanding.
    TurnCapReached,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Termination::Accepted => "accepted",
            Termination::TurnCapReached => "turn_cap_reached",
        };
        write!(f, "{s}")
    }
}

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub final_state: SharedState,
    pub termination: Termination,
    pub policy: ReviewPolicy,
    pub max_turns: u32,
    pub trace: Vec<TraceEvent>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn accepted(&self) -> bool {
        self.termination == Termination::Accepted
    }

    /// Number of supervisor invocations in this run.
    pub fn supervisor_turns(&self) -> usize {
        self.trace
            .iter()
            .filter(|e| e.role == Role::Supervisor)
            .count()
    }
}

/// Drives a run from its initial state to `Terminated`.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: LoopConfig,
}

impl Engine {
    pub fn new(config: LoopConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run to termination without an observer.
    pub fn run(&self, initial: SharedState) -> RunReport {
        self.run_observed(initial, &mut NoopObserver)
    }

    /// Run to termination, handing every trace event to `observer` as it
    /// happens.
    #[instrument(skip_all, fields(max_turns = self.config.max_turns))]
    pub fn run_observed<O>(&self, initial: SharedState, observer: &mut O) -> RunReport
    where
        O: TraceObserver + ?Sized,
    {
        self.drive(initial, observer, step_ceiling(self.config.max_turns))
    }

    fn drive<O>(&self, initial: SharedState, observer: &mut O, ceiling: usize) -> RunReport
    where
        O: TraceObserver + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let run_id_str = run_id.to_string();
        let _span = RunSpan::enter(&run_id_str);

        let started_at = Utc::now();
        let clock = Instant::now();
        let max_turns = self.config.max_turns;
        let policy = self.config.review_policy(initial.strict_mode);

        emit_run_started(&run_id_str, max_turns, &policy.to_string());

        let mut state = initial.clone();
        let mut journal: Vec<StateDelta> = Vec::new();
        let mut trace: Vec<TraceEvent> = Vec::new();
        let mut current = EngineState::Supervisor;

        while let Some(role) = current.role() {
            if journal.len() >= ceiling {
                emit_step_ceiling_hit(&run_id_str, ceiling);
                break;
            }

            let step = journal.len();
            let delta = role.invoke(&state, policy);
            let modified = delta.keys();
            journal.push(delta.clone());
            state = merge(state, delta);
            METRICS.inc_role_invocations();

            let (next, decision) = match role {
                Role::Supervisor => {
                    let decision = route(&state, max_turns);
                    emit_route_decided(&run_id_str, state.turn_count, decision);
                    (EngineState::after_route(decision), Some(decision))
                }
                Role::Planner | Role::Reviewer => (EngineState::Supervisor, None),
            };

            emit_role_invoked(&run_id_str, step, role, &modified, state.turn_count);
            let event = TraceEvent::capture(step, role, modified, &state, decision);
            observer.on_step(&event);
            trace.push(event);

            current = next;
        }

        // Replaying the journal must reproduce the live state; a mismatch means
        // merge is no longer a pure fold.
        let final_state = materialize(&initial, &journal);
        if final_state != state {
            emit_materialize_mismatch(&run_id_str);
        }

        let termination = if final_state.is_accepted() {
            Termination::Accepted
        } else {
            METRICS.inc_turn_cap_hits();
            Termination::TurnCapReached
        };
        METRICS.inc_runs_completed();

        let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        emit_run_finished(
            &run_id_str,
            duration_ms,
            final_state.turn_count,
            final_state.is_accepted(),
            &termination.to_string(),
        );

        RunReport {
            run_id,
            final_state,
            termination,
            policy,
            max_turns,
            trace,
            started_at,
            finished_at: Utc::now(),
            duration_ms,
        }
    }
}

/// Run one loop with the default configuration and return the final state.
pub fn run_once(initial: SharedState) -> SharedState {
    Engine::default().run(initial).final_state
}

/// Hard bound on role invocations for one run.
///
/// The router bypasses the cap only to produce a first proposal or review
/// an unreviewed one, so a run needs at most `2 * (max_turns + 3) + 1` steps.
fn step_ceiling(max_turns: u32) -> usize {
    usize::try_from(max_turns)
        .unwrap_or(usize::MAX)
        .saturating_add(4)
        .saturating_mul(2)
}
