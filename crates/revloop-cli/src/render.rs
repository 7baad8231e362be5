//! Plain-text transcript of a finished run.

use revloop_core::{Feedback, Role, RunReport, StateKey, TraceEvent};

/// Render every step of `report` followed by the final disposition.
pub fn render_transcript(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Run {}\n", report.run_id));
    out.push_str(&"=".repeat(4 + report.run_id.to_string().len()));
    out.push('\n');
    out.push_str(&format!(
        "title: {}\nmax_turns: {}\npolicy: {}\n",
        report.final_state.title, report.max_turns, report.policy
    ));

    for event in &report.trace {
        out.push('\n');
        render_step(&mut out, event);
    }

    out.push_str(&format!(
        "\nfinal turn_count: {}\naccepted: {}\ntermination: {}\n",
        report.final_state.turn_count,
        report.accepted(),
        report.termination
    ));

    out.trim_end().to_string()
}

fn render_step(out: &mut String, event: &TraceEvent) {
    out.push_str(&format!(
        "[{}] {} -> {}\n",
        event.step,
        event.role.label(),
        keys(&event.modified)
    ));

    match event.role {
        Role::Supervisor => {
            out.push_str(&format!("  turn_count: {}\n", event.turn_count));
            if let Some(route) = event.route {
                out.push_str(&format!("  next: {route}\n"));
            }
        }
        Role::Planner => {
            if let Some(proposal) = &event.proposal {
                out.push_str(&format!("  tags: {}\n", proposal.tags.join(", ")));
                out.push_str(&format!("  summary: {}\n", proposal.summary));
            }
            // Feedback from the previous review, still in the state.
            match &event.feedback {
                Some(feedback) => out.push_str(&format!(
                    "  prior feedback: {}\n",
                    feedback_line(feedback)
                )),
                None => out.push_str("  prior feedback: none\n"),
            }
        }
        Role::Reviewer => {
            if let Some(feedback) = &event.feedback {
                if feedback.issues().is_empty() {
                    out.push_str("  issues: none\n");
                } else {
                    out.push_str("  issues:\n");
                    for issue in feedback.issues() {
                        out.push_str(&format!("    - {issue}\n"));
                    }
                }
                out.push_str(&format!("  verdict: {}\n", verdict(feedback)));
            }
        }
    }
}

fn verdict(feedback: &Feedback) -> &'static str {
    if feedback.accepted() {
        "OK"
    } else {
        "REJECTED"
    }
}

fn feedback_line(feedback: &Feedback) -> String {
    if feedback.issues().is_empty() {
        verdict(feedback).to_string()
    } else {
        format!("{} ({})", verdict(feedback), feedback.issues().join("; "))
    }
}

fn keys(modified: &[StateKey]) -> String {
    if modified.is_empty() {
        return "(nothing)".to_string();
    }
    modified
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use revloop_core::{Engine, SharedState};

    #[test]
    fn transcript_shows_tags_summary_and_verdict() {
        let report = Engine::default().run(SharedState::new(
            "Understanding Caching Systems",
            "Caches store data. Caches speed up access.",
        ));
        let text = render_transcript(&report);

        assert!(text.contains("[0] Supervisor -> turn_count"));
        assert!(text.contains("[1] Planner -> proposal"));
        assert!(text.contains("tags: cache, understanding, caching"));
        assert!(text.contains("summary: Caches store data"));
        assert!(text.contains("Reviewer -> feedback"));
        assert!(text.contains("verdict: OK"));
        assert!(text.ends_with("termination: accepted"));
        assert!(text.contains("final turn_count: 3"));
    }

    #[test]
    fn transcript_lists_outstanding_issues() {
        let report =
            Engine::default().run(SharedState::new("Caching", "Caches.").with_force_issue(true));
        let text = render_transcript(&report);

        assert!(text.contains("    - Forced issue for loop testing"));
        assert!(text.contains("verdict: REJECTED"));
        assert!(text.contains("accepted: false"));
        assert!(text.ends_with("termination: turn_cap_reached"));
    }

    #[test]
    fn planner_steps_show_carried_over_feedback() {
        let report =
            Engine::default().run(SharedState::new("Caching", "Caches.").with_force_issue(true));
        let text = render_transcript(&report);

        // First proposal has nothing to carry; the revision sees the rejection.
        assert!(text.contains("  prior feedback: none"));
        assert!(text.contains("  prior feedback: REJECTED (Forced issue for loop testing)"));
    }

    #[test]
    fn feedback_line_lists_issues() {
        let accepted = Feedback::new(vec![], None);
        assert_eq!(feedback_line(&accepted), "OK");

        let rejected = Feedback::new(vec!["a".to_string(), "b".to_string()], None);
        assert_eq!(feedback_line(&rejected), "REJECTED (a; b)");
    }

    #[test]
    fn empty_key_list_renders_placeholder() {
        assert_eq!(keys(&[]), "(nothing)");
        assert_eq!(
            keys(&[StateKey::TurnCount, StateKey::Feedback]),
            "turn_count, feedback"
        );
    }
}
