//! Shared loop state and the records roles exchange through it.
//!
//! [`SharedState`] is the only channel between roles. Each role reads it and
//! returns a [`StateDelta`]; the engine folds deltas back in with
//! [`merge`](crate::merge::merge).
//!
//! Decoding from JSON is lenient about shape: a proposal whose `tags` is not a
//! list decodes with no tags, and an empty object decodes as "absent". The
//! reviewer then reports the problem as an issue instead of the run aborting.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest as _, Sha256};

/// Number of tags a proposal must carry to pass review.
pub const REQUIRED_TAGS: usize = 3;

/// Planner output: keyword tags plus a one-sentence summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    /// Reserved for proposer-side self checks; always emitted empty.
    #[serde(default, deserialize_with = "lenient_strings")]
    pub issues: Vec<String>,
}

impl Proposal {
    pub fn new(tags: Vec<String>, summary: impl Into<String>) -> Self {
        Self {
            tags,
            summary: summary.into(),
            issues: Vec::new(),
        }
    }

    /// SHA-256 hex digest over the proposal fields.
    ///
    /// Feedback records the digest of the proposal it reviewed, which is how
    /// the router tells whether the current proposal still needs review.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"tags\0");
        for tag in &self.tags {
            hasher.update(tag.as_bytes());
            hasher.update(b"\0");
        }
        hasher.update(b"summary\0");
        hasher.update(self.summary.as_bytes());
        hasher.update(b"\0issues\0");
        for issue in &self.issues {
            hasher.update(issue.as_bytes());
            hasher.update(b"\0");
        }
        hex::encode(hasher.finalize())
    }
}

/// Reviewer verdict on a proposal.
///
/// `accepted` is derived from `issues` at construction and on decode, so
/// `accepted == issues.is_empty()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFeedback")]
pub struct Feedback {
    issues: Vec<String>,
    accepted: bool,
    /// Digest of the reviewed proposal, `None` when there was nothing to review.
    proposal_digest: Option<String>,
}

impl Feedback {
    pub fn new(issues: Vec<String>, proposal_digest: Option<String>) -> Self {
        let accepted = issues.is_empty();
        Self {
            issues,
            accepted,
            proposal_digest,
        }
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn proposal_digest(&self) -> Option<&str> {
        self.proposal_digest.as_deref()
    }

    /// `true` when this feedback was produced for `proposal`.
    pub fn reviews(&self, proposal: &Proposal) -> bool {
        self.proposal_digest.as_deref() == Some(proposal.digest().as_str())
    }
}

#[derive(Deserialize)]
struct RawFeedback {
    #[serde(default, deserialize_with = "lenient_strings")]
    issues: Vec<String>,
    #[serde(default, deserialize_with = "lenient_optional_string")]
    proposal_digest: Option<String>,
}

impl From<RawFeedback> for Feedback {
    fn from(raw: RawFeedback) -> Self {
        Feedback::new(raw.issues, raw.proposal_digest)
    }
}

/// The record threaded through every role invocation of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SharedState {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub turn_count: u32,
    #[serde(default, deserialize_with = "present_object")]
    pub proposal: Option<Proposal>,
    #[serde(default, deserialize_with = "present_object")]
    pub feedback: Option<Feedback>,
    /// Reserved for a stricter review policy; roles never modify it.
    #[serde(default)]
    pub strict_mode: bool,
    /// Test hook: makes the reviewer always report an issue.
    #[serde(default)]
    pub force_issue: bool,
}

impl SharedState {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    pub fn with_force_issue(mut self, force_issue: bool) -> Self {
        self.force_issue = force_issue;
        self
    }

    /// Acceptance of the latest feedback; `false` if the reviewer never ran.
    pub fn is_accepted(&self) -> bool {
        self.feedback.as_ref().is_some_and(Feedback::accepted)
    }

    /// Issues from the latest feedback, empty if the reviewer never ran.
    pub fn outstanding_issues(&self) -> &[String] {
        self.feedback.as_ref().map(Feedback::issues).unwrap_or(&[])
    }
}

/// Keys of [`SharedState`] that a role may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKey {
    TurnCount,
    Proposal,
    Feedback,
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StateKey::TurnCount => "turn_count",
            StateKey::Proposal => "proposal",
            StateKey::Feedback => "feedback",
        };
        write!(f, "{s}")
    }
}

/// Partial update returned by a role. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<Proposal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl StateDelta {
    pub fn turn_count(turn_count: u32) -> Self {
        Self {
            turn_count: Some(turn_count),
            ..Self::default()
        }
    }

    pub fn proposal(proposal: Proposal) -> Self {
        Self {
            proposal: Some(proposal),
            ..Self::default()
        }
    }

    pub fn feedback(feedback: Feedback) -> Self {
        Self {
            feedback: Some(feedback),
            ..Self::default()
        }
    }

    /// Keys this delta writes, in declaration order.
    pub fn keys(&self) -> Vec<StateKey> {
        let mut keys = Vec::new();
        if self.turn_count.is_some() {
            keys.push(StateKey::TurnCount);
        }
        if self.proposal.is_some() {
            keys.push(StateKey::Proposal);
        }
        if self.feedback.is_some() {
            keys.push(StateKey::Feedback);
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.turn_count.is_none() && self.proposal.is_none() && self.feedback.is_none()
    }
}

fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// `null`, `{}` and non-objects decode as `None`.
fn present_object<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) if value.as_object().is_some_and(|m| !m.is_empty()) => {
            serde_json::from_value(value).map(Some).map_err(D::Error::custom)
        }
        _ => Ok(None),
    }
}
