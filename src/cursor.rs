//! Sentence-by-sentence stepping through the focused element.

use crate::text_utils::split_into_sentences;
use serde::Serialize;

/// Progress through the sentences of the focused element's label.
///
/// Sentences are re-split from the label on every step, so edits to the page
/// show up on the next step. `index` points at the next sentence a forward
/// step will speak and always stays within `0..=sentences.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentenceCursor {
    sentences: Vec<String>,
    index: usize,
}

impl SentenceCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.sentences.clear();
    }

    /// Returns the sentence to speak, or `None` once past the last one.
    pub fn step_forward(&mut self, label: &str) -> Option<String> {
        self.sentences = split_into_sentences(label);
        let sentence = self.sentences.get(self.index)?.clone();
        self.index += 1;
        Some(sentence)
    }

    /// Moves back two positions (undoing the previous forward step) and then
    /// behaves like a forward step from there.
    pub fn step_backward(&mut self, label: &str) -> Option<String> {
        self.index = if self.index > 1 { self.index - 2 } else { 0 };
        self.sentences = split_into_sentences(label);
        let sentence = self.sentences.get(self.index).cloned();
        self.index = (self.index + 1).min(self.sentences.len());
        sentence
    }
}

#[cfg(test)]
mod tests {
    use super::SentenceCursor;

    const THREE: &str = "One is first. Two is next. Three ends it.";

    #[test]
    fn forward_walks_then_stops_without_wrapping() {
        let mut cursor = SentenceCursor::new();
        assert_eq!(cursor.step_forward(THREE).as_deref(), Some("One is first."));
        assert_eq!(cursor.step_forward(THREE).as_deref(), Some("Two is next."));
        assert_eq!(cursor.step_forward(THREE).as_deref(), Some("Three ends it."));
        assert_eq!(cursor.step_forward(THREE), None);
        assert_eq!(cursor.index(), 3);
    }

    #[test]
    fn backward_at_the_start_repeats_the_first_sentence() {
        let mut cursor = SentenceCursor::new();
        assert_eq!(cursor.step_forward(THREE).as_deref(), Some("One is first."));
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.step_backward(THREE).as_deref(), Some("One is first."));
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.step_forward(THREE).as_deref(), Some("Two is next."));
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn backward_speaks_the_previous_sentence() {
        let mut cursor = SentenceCursor::new();
        cursor.step_forward(THREE);
        cursor.step_forward(THREE);
        cursor.step_forward(THREE);
        assert_eq!(cursor.step_backward(THREE).as_deref(), Some("Two is next."));
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn backward_on_fresh_cursor_speaks_first() {
        let mut cursor = SentenceCursor::new();
        assert_eq!(cursor.step_backward(THREE).as_deref(), Some("One is first."));
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn index_clamps_when_label_shrinks() {
        let mut cursor = SentenceCursor::new();
        cursor.step_forward(THREE);
        cursor.step_forward(THREE);
        cursor.step_forward(THREE);
        assert_eq!(cursor.step_backward("").as_deref(), None);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn edits_are_picked_up_between_steps() {
        let mut cursor = SentenceCursor::new();
        cursor.step_forward(THREE);
        assert_eq!(
            cursor.step_forward("One is first. Changed second. Third.").as_deref(),
            Some("Changed second.")
        );
    }
}
