//! Routing decisions.
//!
//! After every supervisor turn the engine asks [`route`] where to go next.
//! The first matching rule wins:
//!
//! 1. no proposal yet -> [`Route::Planner`]
//! 2. the current proposal has no feedback -> [`Route::Reviewer`]
//! 3. the feedback has issues and `turn_count < max_turns` -> [`Route::Planner`]
//! 4. otherwise -> [`Route::Terminate`]
//!
//! Rule 3 is the only place the turn cap applies. Once it is reached,
//! outstanding issues stand as final.

use serde::{Deserialize, Serialize};

use crate::domain::SharedState;
use crate::roles::Role;

/// Default cap on supervisor turns.
pub const DEFAULT_MAX_TURNS: u32 = 5;

/// Next hop chosen by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Planner,
    Reviewer,
    Terminate,
}

impl Route {
    /// The role this route dispatches to, `None` for [`Route::Terminate`].
    pub fn role(self) -> Option<Role> {
        match self {
            Route::Planner => Some(Role::Planner),
            Route::Reviewer => Some(Role::Reviewer),
            Route::Terminate => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Route::Planner => "planner",
            Route::Reviewer => "reviewer",
            Route::Terminate => "terminate",
        };
        write!(f, "{s}")
    }
}

/// Pick the next hop for `state` under a cap of `max_turns`.
pub fn route(state: &SharedState, max_turns: u32) -> Route {
    let Some(proposal) = state.proposal.as_ref() else {
        return Route::Planner;
    };

    match state.feedback.as_ref() {
        Some(feedback) if feedback.reviews(proposal) => {
            if !feedback.issues().is_empty() && state.turn_count < max_turns {
                Route::Planner
            } else {
                Route::Terminate
            }
        }
        _ => Route::Reviewer,
    }
}
