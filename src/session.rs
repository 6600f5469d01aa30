//! Per-page narration state.

use crate::cursor::SentenceCursor;
use crate::dom::{Document, ElementId, Rect};
use crate::highlight::{HighlightStyle, Highlighter};
use crate::label::extract_label;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Keys and clicks drive navigation.
    #[default]
    Browse,
    /// Input reaches the page untouched.
    Typing,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Browse => Mode::Typing,
            Mode::Typing => Mode::Browse,
        }
    }

    /// Spoken name of the mode.
    pub fn announcement(self) -> &'static str {
        match self {
            Mode::Browse => "Browse mode",
            Mode::Typing => "Typing mode",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Mode::Browse => "browse",
            Mode::Typing => "typing",
        };
        write!(f, "{}", label)
    }
}

/// Mode, focus, sentence cursor and highlight for one page.
///
/// Focus is a handle into the [`Document`] and is re-checked on every read;
/// once the element is gone the session behaves as if nothing were focused.
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: Mode,
    focus: Option<ElementId>,
    cursor: SentenceCursor,
    highlighter: Highlighter,
}

impl Session {
    pub fn new(style: HighlightStyle) -> Self {
        Self {
            highlighter: Highlighter::new(style),
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// The focused element, if it is still attached to `doc`.
    pub fn focus(&self, doc: &Document) -> Option<ElementId> {
        self.focus.filter(|id| doc.contains(*id))
    }

    /// Move focus; the sentence cursor always restarts.
    pub fn set_focus(&mut self, element: ElementId) {
        self.focus = Some(element);
        self.cursor.reset();
    }

    pub fn cursor(&self) -> &SentenceCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut SentenceCursor {
        &mut self.cursor
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn highlighter_mut(&mut self) -> &mut Highlighter {
        &mut self.highlighter
    }

    /// Clear the marker once its element has left `doc`.
    pub fn drop_stale_highlight(&mut self, doc: &Document) -> bool {
        let stale = self
            .highlighter
            .marker()
            .is_some_and(|marker| !doc.contains(marker.element));
        if stale {
            self.highlighter.clear();
        }
        stale
    }

    pub fn snapshot(&self, doc: &Document) -> SessionSnapshot {
        let focus = self.focus(doc);
        let viewport = doc.viewport();
        SessionSnapshot {
            mode: self.mode,
            focus,
            focus_tag: focus.and_then(|id| doc.tag_name(id)).map(str::to_string),
            focus_label: focus.map(|id| extract_label(doc, id)),
            sentence_index: self.cursor.index(),
            sentence_count: self.cursor.sentences().len(),
            highlight: self
                .highlighter
                .marker()
                .map(|marker| marker.viewport_rect(&viewport)),
            scroll_y: viewport.scroll_y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub focus: Option<ElementId>,
    pub focus_tag: Option<String>,
    pub focus_label: Option<String>,
    pub sentence_index: usize,
    pub sentence_count: usize,
    /// On-screen box of the highlight marker.
    pub highlight: Option<Rect>,
    pub scroll_y: f32,
}
