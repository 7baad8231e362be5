//! Proposal validation.
//!
//! Rules run in a fixed order and each contributes at most one issue. An
//! empty issue list means the proposal is accepted. The reviewer reports; it
//! never edits the proposal.

use serde::{Deserialize, Serialize};

use crate::domain::{Feedback, Proposal, REQUIRED_TAGS};

pub const FORCED_ISSUE: &str = "Forced issue for loop testing";
pub const MISSING_TAGS_ISSUE: &str = "Planner must provide 3 tags";
pub const MISSING_SUMMARY_ISSUE: &str = "Planner must provide a one-sentence summary";

/// Review policy selected by `strict_mode`.
///
/// `Strict` is an extension point: it currently adds no checks beyond
/// `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPolicy {
    #[default]
    Standard,
    Strict,
}

impl ReviewPolicy {
    pub fn from_strict_mode(strict_mode: bool) -> Self {
        if strict_mode {
            ReviewPolicy::Strict
        } else {
            ReviewPolicy::Standard
        }
    }

    /// Extra issues this policy raises on top of the base rules.
    fn extra_issues(self, _proposal: Option<&Proposal>) -> Vec<String> {
        match self {
            ReviewPolicy::Standard | ReviewPolicy::Strict => Vec::new(),
        }
    }
}

impl std::fmt::Display for ReviewPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReviewPolicy::Standard => "standard",
            ReviewPolicy::Strict => "strict",
        };
        write!(f, "{s}")
    }
}

/// Validate `proposal` and produce feedback bound to its digest.
pub fn review(proposal: Option<&Proposal>, force_issue: bool, policy: ReviewPolicy) -> Feedback {
    let mut issues = Vec::new();

    if force_issue {
        issues.push(FORCED_ISSUE.to_string());
    }

    if proposal.map_or(true, |p| p.tags.len() < REQUIRED_TAGS) {
        issues.push(MISSING_TAGS_ISSUE.to_string());
    }

    if proposal.map_or(true, |p| p.summary.is_empty()) {
        issues.push(MISSING_SUMMARY_ISSUE.to_string());
    }

    issues.extend(policy.extra_issues(proposal));

    Feedback::new(issues, proposal.map(Proposal::digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::planner::propose;

    fn valid() -> Proposal {
        Proposal::new(
            vec!["alpha".into(), "beta".into(), "gamma".into()],
            "A summary",
        )
    }

    #[test]
    fn test_valid_proposal_is_accepted() {
        let p = valid();
        let fb = review(Some(&p), false, ReviewPolicy::Standard);
        assert!(fb.accepted());
        assert!(fb.issues().is_empty());
        assert!(fb.reviews(&p));
    }

    #[test]
    fn test_absent_proposal_reports_tags_and_summary() {
        let fb = review(None, false, ReviewPolicy::Standard);
        assert!(!fb.accepted());
        assert_eq!(fb.issues(), [MISSING_TAGS_ISSUE, MISSING_SUMMARY_ISSUE]);
        assert!(fb.proposal_digest().is_none());
    }

    #[test]
    fn test_forced_issue_comes_first() {
        let fb = review(None, true, ReviewPolicy::Standard);
        assert_eq!(
            fb.issues(),
            [FORCED_ISSUE, MISSING_TAGS_ISSUE, MISSING_SUMMARY_ISSUE]
        );
    }

    #[test]
    fn test_forced_issue_on_valid_proposal() {
        let fb = review(Some(&valid()), true, ReviewPolicy::Standard);
        assert_eq!(fb.issues(), [FORCED_ISSUE]);
        assert!(!fb.accepted());
    }

    #[test]
    fn test_too_few_tags() {
        let p = Proposal::new(vec!["only".into(), "two".into()], "Summary");
        let fb = review(Some(&p), false, ReviewPolicy::Standard);
        assert_eq!(fb.issues(), [MISSING_TAGS_ISSUE]);
    }

    #[test]
    fn test_more_than_three_tags_is_fine() {
        let p = Proposal::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            "Summary",
        );
        assert!(review(Some(&p), false, ReviewPolicy::Standard).accepted());
    }

    #[test]
    fn test_empty_summary() {
        let p = Proposal::new(vec!["a".into(), "b".into(), "c".into()], "");
        let fb = review(Some(&p), false, ReviewPolicy::Standard);
        assert_eq!(fb.issues(), [MISSING_SUMMARY_ISSUE]);
    }

    #[test]
    fn test_malformed_decoded_proposal_degrades_to_issues() {
        let p: Proposal = serde_json::from_str(r#"{"tags": {"not": "a list"}}"#).unwrap();
        let fb = review(Some(&p), false, ReviewPolicy::Standard);
        assert_eq!(fb.issues(), [MISSING_TAGS_ISSUE, MISSING_SUMMARY_ISSUE]);
    }

    #[test]
    fn test_strict_policy_matches_standard_today() {
        for p in [valid(), propose("", ""), Proposal::default()] {
            let standard = review(Some(&p), false, ReviewPolicy::Standard);
            let strict = review(Some(&p), false, ReviewPolicy::Strict);
            assert_eq!(standard, strict);
        }
    }

    #[test]
    fn test_review_does_not_mutate_proposal() {
        let p = valid();
        let before = p.clone();
        let _ = review(Some(&p), true, ReviewPolicy::Strict);
        assert_eq!(p, before);
    }

    #[test]
    fn test_policy_from_strict_mode() {
        assert_eq!(ReviewPolicy::from_strict_mode(false), ReviewPolicy::Standard);
        assert_eq!(ReviewPolicy::from_strict_mode(true), ReviewPolicy::Strict);
        assert_eq!(ReviewPolicy::Strict.to_string(), "strict");
    }
}
