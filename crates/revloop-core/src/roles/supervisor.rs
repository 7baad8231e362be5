//! Turn accounting.

use crate::domain::{SharedState, StateDelta};

/// Advance the turn counter by one. Returns only the new `turn_count`.
pub fn supervise(state: &SharedState) -> StateDelta {
    StateDelta::turn_count(state.turn_count.saturating_add(1))
}
