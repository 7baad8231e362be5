//! Lexical feature extraction.
//!
//! Turns a title and body into a ranked keyword table: lowercase, split on
//! runs of ASCII letters and digits, drop short tokens and stop words, strip
//! a trailing plural `s`, then count. Ranking is by count, ties kept in
//! first-seen order.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tokens shorter than this are never keywords.
pub const MIN_TOKEN_LEN: usize = 4;

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("valid token regex (verified by tests)"));

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "when", "while", "to", "of", "in",
    "on", "for", "with", "as", "by", "at", "from", "into", "about", "it", "this", "that", "these",
    "those", "is", "are", "was", "were", "be", "been", "being", "can", "could", "should", "would",
    "will", "may", "might", "must", "do", "does", "did", "how", "what", "why", "who", "whom",
    "which", "we", "you", "they", "i", "he", "she", "them", "us", "our", "your", "their",
];

/// One ranked keyword and its frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub token: String,
    pub count: usize,
}

/// Keywords ranked by descending count, ties in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordTable {
    entries: Vec<Keyword>,
}

impl KeywordTable {
    pub fn entries(&self) -> &[Keyword] {
        &self.entries
    }

    /// The first `n` tokens by rank.
    pub fn top(&self, n: usize) -> Vec<&str> {
        self.entries
            .iter()
            .take(n)
            .map(|k| k.token.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Naive plural stripping: `systems` -> `system`, but `access` and `bus` stay.
pub fn normalize_token(token: &str) -> &str {
    if token.len() > MIN_TOKEN_LEN && token.ends_with('s') && !token.ends_with("ss") {
        &token[..token.len() - 1]
    } else {
        token
    }
}

/// Candidate keyword tokens of `title` + `content`, in text order.
pub fn tokenize(title: &str, content: &str) -> Vec<String> {
    let text = format!("{title} {content}").to_lowercase();
    TOKEN_REGEX
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|t| t.len() >= MIN_TOKEN_LEN && !is_stop_word(t))
        .map(|t| normalize_token(t).to_string())
        .collect()
}

/// Build the ranked keyword table for a document.
pub fn extract_keywords(title: &str, content: &str) -> KeywordTable {
    let mut entries: Vec<Keyword> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in tokenize(title, content) {
        match index.get(&token) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(token.clone(), entries.len());
                entries.push(Keyword { token, count: 1 });
            }
        }
    }

    // sort_by is stable, so equal counts keep first-seen order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    KeywordTable { entries }
}
