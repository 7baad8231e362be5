//! Domain models for revloop.
//!
//! - `SharedState`: the record threaded through a run
//! - `Proposal` / `Feedback`: what the planner and reviewer exchange
//! - `StateDelta`: a role's partial update

pub mod error;
pub mod state;

pub use error::{Result, RevloopError};
pub use state::{Feedback, Proposal, SharedState, StateDelta, StateKey, REQUIRED_TAGS};
