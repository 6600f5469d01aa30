//! Overlay marking the focused element.

use crate::config::HighlightColor;
use crate::dom::{Document, ElementId, Rect, Viewport};
use serde::Serialize;
use tracing::debug;

/// Stacking order above any page content.
pub const OVERLAY_Z_INDEX: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighlightStyle {
    pub color: HighlightColor,
    pub border_px: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: HighlightColor {
                r: 1.0,
                g: 1.0,
                b: 0.0,
                a: 0.15,
            },
            border_px: 3.0,
        }
    }
}

/// A single non-interactive box drawn over an element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightMarker {
    pub element: ElementId,
    /// Document coordinates, so the on-screen box follows scrolling.
    pub rect: Rect,
    pub style: HighlightStyle,
    pub z_index: i32,
    pub intercepts_pointer: bool,
}

impl HighlightMarker {
    pub fn viewport_rect(&self, viewport: &Viewport) -> Rect {
        self.rect.translated(0.0, -viewport.scroll_y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    style: HighlightStyle,
    marker: Option<HighlightMarker>,
}

impl Highlighter {
    pub fn new(style: HighlightStyle) -> Self {
        Self {
            style,
            marker: None,
        }
    }

    pub fn marker(&self) -> Option<&HighlightMarker> {
        self.marker.as_ref()
    }

    /// Replace any existing marker with one over `element`'s current box.
    /// Stale handles just clear the marker.
    pub fn highlight(&mut self, doc: &Document, element: ElementId) -> Option<&HighlightMarker> {
        self.marker = None;
        let rect = doc.bounding_box(element)?;
        debug!(%element, x = rect.x, y = rect.y, w = rect.width, h = rect.height, "Highlighting");
        self.marker = Some(HighlightMarker {
            element,
            rect,
            style: self.style,
            z_index: OVERLAY_Z_INDEX,
            intercepts_pointer: false,
        });
        self.marker.as_ref()
    }

    pub fn clear(&mut self) {
        self.marker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::selector::PARAGRAPHS;
    use crate::dom::ScrollAlign;

    fn doc() -> Document {
        let body: String = (0..40).map(|i| format!("<p>Paragraph number {i}.</p>")).collect();
        Document::parse(&format!("<html><body>{body}</body></html>"), Viewport::new(600.0, 200.0))
    }

    #[test]
    fn new_highlight_replaces_the_old_marker() {
        let doc = doc();
        let paragraphs = doc.query(&PARAGRAPHS);
        let mut highlighter = Highlighter::default();
        highlighter.highlight(&doc, paragraphs[0]);
        highlighter.highlight(&doc, paragraphs[1]);
        let marker = highlighter.marker().unwrap();
        assert_eq!(marker.element, paragraphs[1]);
        assert_eq!(marker.rect, doc.bounding_box(paragraphs[1]).unwrap());
        assert_eq!(marker.z_index, OVERLAY_Z_INDEX);
        assert!(!marker.intercepts_pointer);
    }

    #[test]
    fn marker_tracks_scrolling() {
        let mut doc = doc();
        let target = doc.query(&PARAGRAPHS)[30];
        let mut highlighter = Highlighter::default();
        highlighter.highlight(&doc, target);
        doc.scroll_into_view(target, ScrollAlign::Start);
        let on_screen = highlighter.marker().unwrap().viewport_rect(&doc.viewport());
        assert_eq!(on_screen, doc.client_rect(target).unwrap());
    }

    #[test]
    fn stale_element_clears_marker() {
        let mut doc = doc();
        let paragraphs = doc.query(&PARAGRAPHS);
        let mut highlighter = Highlighter::default();
        highlighter.highlight(&doc, paragraphs[0]);
        doc.remove(paragraphs[1]);
        assert!(highlighter.highlight(&doc, paragraphs[1]).is_none());
        assert!(highlighter.marker().is_none());
    }
}
