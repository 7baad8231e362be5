//! Role vocabulary and dispatch.
//!
//! Three roles take part in a run:
//!
//! - [`supervisor`]: counts turns
//! - [`planner`]: derives tags and a summary from the document
//! - [`reviewer`]: validates the latest proposal
//!
//! Every role is a pure, total function from [`SharedState`] to a
//! [`StateDelta`]. Roles never call one another; the engine dispatches
//! through [`Role::invoke`].

pub mod planner;
pub mod reviewer;
pub mod supervisor;

use serde::{Deserialize, Serialize};

use crate::domain::{SharedState, StateDelta, StateKey};

pub use planner::propose;
pub use reviewer::{review, ReviewPolicy};
pub use supervisor::supervise;

/// The roles of the revision loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Supervisor,
    Planner,
    Reviewer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Supervisor => "supervisor",
            Role::Planner => "planner",
            Role::Reviewer => "reviewer",
        };
        write!(f, "{s}")
    }
}

impl Role {
    /// The single state key this role writes.
    pub fn produces(self) -> StateKey {
        match self {
            Role::Supervisor => StateKey::TurnCount,
            Role::Planner => StateKey::Proposal,
            Role::Reviewer => StateKey::Feedback,
        }
    }

    /// Human-readable label for transcripts and logs.
    pub fn label(self) -> &'static str {
        match self {
            Role::Supervisor => "Supervisor",
            Role::Planner => "Planner",
            Role::Reviewer => "Reviewer",
        }
    }

    /// Run this role against `state` under `policy`.
    pub fn invoke(self, state: &SharedState, policy: ReviewPolicy) -> StateDelta {
        match self {
            Role::Supervisor => supervise(state),
            Role::Planner => StateDelta::proposal(propose(&state.title, &state.content)),
            Role::Reviewer => StateDelta::feedback(review(
                state.proposal.as_ref(),
                state.force_issue,
                policy,
            )),
        }
    }
}
