//! Text splitting helpers for sentence narration.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+(?:\s|$)").unwrap());

/// Collapse whitespace runs to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Lightweight sentence splitter based on terminal punctuation.
///
/// Each run ending in `.`, `!` or `?` followed by whitespace (or the end of
/// the text) is one sentence. Text outside those runs is not kept. With fewer
/// than two such runs the whole text is split on commas outside parentheses
/// instead, and every fragment gets a period appended.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return Vec::new();
    }

    let sentences: Vec<String> = RE_SENTENCE
        .find_iter(&text)
        .map(|found| found.as_str().trim().to_string())
        .collect();
    if sentences.len() > 1 {
        return sentences;
    }
    split_on_commas(&text)
}

fn split_on_commas(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_fragment(&mut fragments, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    push_fragment(&mut fragments, &current);
    fragments
}

// Blank fragments (from stray commas) are dropped rather than spoken as ".".
fn push_fragment(fragments: &mut Vec<String>, raw: &str) {
    let fragment = raw.trim();
    if !fragment.is_empty() {
        fragments.push(format!("{fragment}."));
    }
}
