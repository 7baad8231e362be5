//! Property tests for the revision loop invariants.

use proptest::prelude::*;

use revloop_core::{
    propose, route, Engine, Feedback, LoopConfig, Role, Route, SharedState, DEFAULT_MAX_TURNS,
    REQUIRED_TAGS,
};

fn document() -> impl Strategy<Value = (String, String)> {
    (
        "[A-Za-z0-9 .,!?'-]{0,40}",
        "[A-Za-z0-9 .,!?\n'-]{0,200}",
    )
}

proptest! {
    /// Property: the planner is a pure function of its inputs.
    #[test]
    fn prop_proposal_is_deterministic((title, content) in document()) {
        let a = propose(&title, &content);
        let b = propose(&title, &content);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.digest(), b.digest());
    }

    /// Property: exactly three tags, always.
    #[test]
    fn prop_exactly_three_tags((title, content) in document()) {
        let p = propose(&title, &content);
        prop_assert_eq!(p.tags.len(), REQUIRED_TAGS);
        prop_assert!(!p.summary.is_empty());
        prop_assert!(p.summary.split_whitespace().count() <= 25);
    }

    /// Property: every run terminates within the default cap.
    #[test]
    fn prop_run_terminates_within_cap(
        (title, content) in document(),
        force_issue in any::<bool>(),
        strict_mode in any::<bool>(),
    ) {
        let initial = SharedState::new(title, content)
            .with_force_issue(force_issue)
            .with_strict_mode(strict_mode);
        let report = Engine::default().run(initial);

        prop_assert!(report.final_state.turn_count <= DEFAULT_MAX_TURNS);
        prop_assert_eq!(report.trace.last().map(|e| e.route), Some(Some(Route::Terminate)));
        if force_issue {
            prop_assert!(!report.final_state.is_accepted());
        }
    }

    /// Property: for any cap of at least three, the cap bounds the turn count.
    #[test]
    fn prop_custom_cap_bounds_turns(cap in 3u32..20, force_issue in any::<bool>()) {
        let engine = Engine::new(LoopConfig::default().with_max_turns(cap));
        let report = engine.run(SharedState::new("Caching", "Caches store data.").with_force_issue(force_issue));
        prop_assert!(report.final_state.turn_count <= cap);
    }

    /// Property: each supervisor step adds exactly one turn; other roles add none.
    #[test]
    fn prop_turn_counter_is_monotonic((title, content) in document(), force_issue in any::<bool>()) {
        let report = Engine::default().run(SharedState::new(title, content).with_force_issue(force_issue));

        let mut previous = 0u32;
        for event in &report.trace {
            match event.role {
                Role::Supervisor => prop_assert_eq!(event.turn_count, previous + 1),
                Role::Planner | Role::Reviewer => prop_assert_eq!(event.turn_count, previous),
            }
            previous = event.turn_count;
        }
        prop_assert_eq!(previous, report.final_state.turn_count);
    }

    /// Property: without a proposal the router always asks for one.
    #[test]
    fn prop_router_prefers_planner_without_proposal(
        turn_count in 0u32..100,
        max_turns in 0u32..100,
        with_feedback in any::<bool>(),
        force_issue in any::<bool>(),
        strict_mode in any::<bool>(),
    ) {
        let mut state = SharedState::new("t", "c")
            .with_force_issue(force_issue)
            .with_strict_mode(strict_mode);
        state.turn_count = turn_count;
        if with_feedback {
            state.feedback = Some(Feedback::new(vec!["x".to_string()], None));
        }
        prop_assert_eq!(route(&state, max_turns), Route::Planner);
    }

    /// Property: accepted feedback always means empty issues and a terminate decision.
    #[test]
    fn prop_acceptance_closure((title, content) in document(), turn_count in 0u32..10) {
        let proposal = propose(&title, &content);
        let feedback = revloop_core::review(Some(&proposal), false, Default::default());
        prop_assert_eq!(feedback.accepted(), feedback.issues().is_empty());

        let mut state = SharedState::new(title, content);
        state.turn_count = turn_count;
        state.proposal = Some(proposal);
        state.feedback = Some(feedback.clone());
        if feedback.accepted() {
            prop_assert_eq!(route(&state, DEFAULT_MAX_TURNS), Route::Terminate);
        }
    }
}
