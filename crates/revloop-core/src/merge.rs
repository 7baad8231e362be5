//! State reducer.
//!
//! Folds a role's [`StateDelta`] into [`SharedState`] key by key. Present
//! delta fields overwrite; absent ones leave the state untouched. Nothing is
//! ever removed, and the run inputs (`title`, `content`, flags) are not
//! reachable from a delta at all.

use crate::domain::{SharedState, StateDelta};

/// Apply `delta` to `state` and return the result.
pub fn merge(mut state: SharedState, delta: StateDelta) -> SharedState {
    let StateDelta {
        turn_count,
        proposal,
        feedback,
    } = delta;

    if let Some(turn_count) = turn_count {
        state.turn_count = turn_count;
    }
    if let Some(proposal) = proposal {
        state.proposal = Some(proposal);
    }
    if let Some(feedback) = feedback {
        state.feedback = Some(feedback);
    }
    state
}

/// Rebuild a state by folding a delta journal over `initial`.
pub fn materialize<'a, I>(initial: &SharedState, journal: I) -> SharedState
where
    I: IntoIterator<Item = &'a StateDelta>,
{
    journal
        .into_iter()
        .fold(initial.clone(), |state, delta| merge(state, delta.clone()))
}
