//! Human-readable labels for page elements.

use crate::dom::{Document, ElementId};
use crate::text_utils::collapse_whitespace;

/// Tags whose `alt` attribute names them.
const ALT_BEARING: &[&str] = &["img", "area", "input"];

/// Derive the text announced for `id`.
///
/// Sources are tried in order and the first one with visible characters wins:
/// `aria-label`, `alt`, rendered text, raw text content, `title`, and finally
/// the lowercased tag name. Stale handles produce an empty label.
pub fn extract_label(doc: &Document, id: ElementId) -> String {
    let Some(tag) = doc.tag_name(id) else {
        return String::new();
    };

    let alt = if ALT_BEARING.contains(&tag) {
        doc.attribute(id, "alt")
    } else {
        None
    };

    let candidate = [
        doc.attribute(id, "aria-label"),
        alt,
        doc.rendered_text(id),
        doc.text_content(id),
        doc.attribute(id, "title"),
    ]
    .into_iter()
    .flatten()
    .find(|text| !text.trim().is_empty());

    match candidate {
        Some(text) => collapse_whitespace(text),
        None => tag.to_ascii_lowercase(),
    }
}
