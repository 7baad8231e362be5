//! revloop core library
//!
//! A proposer/critic revision loop: a supervisor counts turns, a planner
//! proposes tags and a summary for a document, a reviewer validates the
//! proposal, and a router decides who goes next until the reviewer accepts
//! or the turn cap is reached.
//!
//! ```no_run
//! use revloop_core::{run_once, SharedState};
//!
//! let state = run_once(SharedState::new(
//!     "Understanding Caching Systems",
//!     "Caches store data. Caches speed up access.",
//! ));
//! assert!(state.is_accepted());
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod executor;
pub mod lexicon;
pub mod merge;
pub mod metrics;
pub mod obs;
pub mod roles;
pub mod router;
pub mod telemetry;
pub mod trace;

pub use config::LoopConfig;
pub use domain::{
    Feedback, Proposal, Result, RevloopError, SharedState, StateDelta, StateKey, REQUIRED_TAGS,
};
pub use engine::{run_once, Engine, EngineState, RunReport, Termination};
pub use executor::{run_batch, BatchConfig};
pub use lexicon::{extract_keywords, Keyword, KeywordTable};
pub use merge::{materialize, merge};
pub use metrics::METRICS;
pub use obs::RunSpan;
pub use roles::{propose, review, supervise, ReviewPolicy, Role};
pub use router::{route, Route, DEFAULT_MAX_TURNS};
pub use telemetry::init_tracing;
pub use trace::{NoopObserver, TraceEvent, TraceObserver};

/// revloop version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
