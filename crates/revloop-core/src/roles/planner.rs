//! Heuristic proposal generation.
//!
//! Tags come from the top of the keyword table, padded with `tag{n}`
//! placeholders. The summary is the first sentence of the body, falling back
//! to the title and then to a fixed literal, capped at [`MAX_SUMMARY_WORDS`].

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Proposal, REQUIRED_TAGS};
use crate::lexicon::extract_keywords;

/// Summaries longer than this are cut and suffixed with [`ELLIPSIS`].
pub const MAX_SUMMARY_WORDS: usize = 25;

pub const ELLIPSIS: &str = "...";

/// Summary used when both title and content are blank.
pub const FALLBACK_SUMMARY: &str = "Auto-generated summary.";

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex (verified by tests)"));

/// Build a proposal for a document. Deterministic and total.
pub fn propose(title: &str, content: &str) -> Proposal {
    Proposal::new(derive_tags(title, content), derive_summary(title, content))
}

/// Up to [`REQUIRED_TAGS`] ranked keywords, padded to exactly that many.
pub fn derive_tags(title: &str, content: &str) -> Vec<String> {
    let table = extract_keywords(title, content);
    let mut tags: Vec<String> = Vec::with_capacity(REQUIRED_TAGS);
    for token in table.top(REQUIRED_TAGS) {
        if !tags.iter().any(|t| t == token) {
            tags.push(token.to_string());
        }
    }
    while tags.len() < REQUIRED_TAGS {
        tags.push(format!("tag{}", tags.len() + 1));
    }
    tags
}

pub fn derive_summary(title: &str, content: &str) -> String {
    let sentence = sentences(content.trim())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .or_else(|| Some(title.trim()).filter(|t| !t.is_empty()))
        .unwrap_or(FALLBACK_SUMMARY);
    truncate_words(sentence, MAX_SUMMARY_WORDS)
}

/// Split on `.`, `!` or `?` followed by whitespace. Terminal punctuation at
/// the very end of the text stays attached to the last segment.
fn sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_BREAK.split(text)
}

fn truncate_words(sentence: &str, max_words: usize) -> String {
    let words: Vec<&str> = sentence.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}{}", words[..max_words].join(" "), ELLIPSIS)
    } else {
        sentence.to_string()
    }
}
