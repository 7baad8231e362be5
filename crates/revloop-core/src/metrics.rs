//! Global atomic counters for revloop observability.
//!
//! Counters are bumped by the engine as a run progresses. Call
//! [`Metrics::flush`] to emit current values as a single `tracing::info!`
//! event (e.g. after a batch).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters, no allocations and no locking.
pub struct Metrics {
    runs_completed: AtomicU64,
    role_invocations: AtomicU64,
    turn_cap_hits: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            runs_completed: AtomicU64::new(0),
            role_invocations: AtomicU64::new(0),
            turn_cap_hits: AtomicU64::new(0),
        }
    }

    /// A run reached `Terminated`.
    pub fn inc_runs_completed(&self) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "runs_completed", "counter incremented");
    }

    /// A role was invoked by the engine.
    pub fn inc_role_invocations(&self) {
        self.role_invocations.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "role_invocations", "counter incremented");
    }

    /// A run ended with unresolved issues because the turn cap was reached.
    pub fn inc_turn_cap_hits(&self) {
        self.turn_cap_hits.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "turn_cap_hits", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            runs_completed = self.runs_completed(),
            role_invocations = self.role_invocations(),
            turn_cap_hits = self.turn_cap_hits(),
        );
    }

    pub fn runs_completed(&self) -> u64 {
        self.runs_completed.load(Ordering::Relaxed)
    }

    pub fn role_invocations(&self) -> u64 {
        self.role_invocations.load(Ordering::Relaxed)
    }

    pub fn turn_cap_hits(&self) -> u64 {
        self.turn_cap_hits.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.runs_completed.store(0, Ordering::Relaxed);
        self.role_invocations.store(0, Ordering::Relaxed);
        self.turn_cap_hits.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let m = Metrics::new();
        assert_eq!(m.runs_completed(), 0);
        m.inc_runs_completed();
        m.inc_runs_completed();
        assert_eq!(m.runs_completed(), 2);

        m.inc_role_invocations();
        assert_eq!(m.role_invocations(), 1);

        m.inc_turn_cap_hits();
        m.inc_turn_cap_hits();
        m.inc_turn_cap_hits();
        assert_eq!(m.turn_cap_hits(), 3);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.inc_runs_completed();
        m.inc_role_invocations();
        m.inc_turn_cap_hits();
        m.reset();
        assert_eq!(m.runs_completed(), 0);
        assert_eq!(m.role_invocations(), 0);
        assert_eq!(m.turn_cap_hits(), 0);
    }
}
