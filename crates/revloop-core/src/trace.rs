//! Per-step trace events.
//!
//! The engine publishes one [`TraceEvent`] after every role invocation, in
//! order, so a renderer can print a transcript without knowing engine
//! internals. Planner and reviewer events carry snapshots of the current
//! proposal and feedback; supervisor events carry the routing decision.

use serde::{Deserialize, Serialize};

use crate::domain::{Feedback, Proposal, SharedState, StateKey};
use crate::roles::Role;
use crate::router::Route;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 0-indexed position in the run.
    pub step: usize,
    pub role: Role,
    /// State keys the role's delta wrote.
    pub modified: Vec<StateKey>,
    /// `turn_count` after the merge.
    pub turn_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<Proposal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    /// Router decision taken after a supervisor step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

impl TraceEvent {
    /// Snapshot `state` (post-merge) for a step of `role`.
    pub fn capture(
        step: usize,
        role: Role,
        modified: Vec<StateKey>,
        state: &SharedState,
        route: Option<Route>,
    ) -> Self {
        let (proposal, feedback) = match role {
            Role::Planner | Role::Reviewer => (state.proposal.clone(), state.feedback.clone()),
            Role::Supervisor => (None, None),
        };
        Self {
            step,
            role,
            modified,
            turn_count: state.turn_count,
            proposal,
            feedback,
            route,
        }
    }
}

/// Receives trace events as the engine produces them.
pub trait TraceObserver {
    fn on_step(&mut self, event: &TraceEvent);
}

impl<F> TraceObserver for F
where
    F: FnMut(&TraceEvent),
{
    fn on_step(&mut self, event: &TraceEvent) {
        self(event)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TraceObserver for NoopObserver {
    fn on_step(&mut self, _event: &TraceEvent) {}
}
