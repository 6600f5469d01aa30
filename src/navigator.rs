//! Element eligibility and sequential navigation.

use crate::dom::{Document, ElementId, SelectorSet};
use crate::label::extract_label;
use tracing::trace;

/// Labels shorter than this carry too little to narrate.
pub const MIN_LABEL_CHARS: usize = 3;

/// Whether `element` may receive narration focus.
///
/// Absent or stale handles, boxes without area, fixed/sticky chrome and
/// elements whose label is shorter than [`MIN_LABEL_CHARS`] are rejected.
pub fn is_valid_element(doc: &Document, element: Option<ElementId>) -> bool {
    let Some(id) = element else {
        return false;
    };
    let Some(rect) = doc.bounding_box(id) else {
        return false;
    };
    if rect.is_empty() {
        return false;
    }
    if doc.position(id).is_some_and(|position| position.is_pinned()) {
        return false;
    }
    extract_label(doc, id).chars().count() >= MIN_LABEL_CHARS
}

/// Valid elements matching `selectors`, in document order.
pub fn valid_matches(doc: &Document, selectors: &SelectorSet) -> Vec<ElementId> {
    doc.query(selectors)
        .into_iter()
        .filter(|id| is_valid_element(doc, Some(*id)))
        .collect()
}

/// The valid match following `current`, wrapping past the end.
///
/// When `current` is absent, stale, or not itself a valid match the first
/// valid match is returned. `None` only when nothing matches.
pub fn get_next(
    doc: &Document,
    selectors: &SelectorSet,
    current: Option<ElementId>,
) -> Option<ElementId> {
    let elements = valid_matches(doc, selectors);
    let first = *elements.first()?;
    let position = current.and_then(|id| elements.iter().position(|candidate| *candidate == id));
    let next = match position {
        Some(idx) => elements.get(idx + 1).copied().unwrap_or(first),
        None => first,
    };
    trace!(
        selectors = %selectors,
        candidates = elements.len(),
        ?current,
        next = %next,
        "Resolved next element"
    );
    Some(next)
}
