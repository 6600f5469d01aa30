//! In-memory model of the page being narrated.
//!
//! HTML is parsed once with `scraper` and every element receives an
//! [`ElementId`] in document order. Ids are never reused: removing an element
//! tombstones it (and its subtree), so handles held elsewhere become stale
//! instead of silently pointing at a different node.

mod layout;
pub mod selector;

pub use layout::{Position, Rect, ScrollAlign, Viewport};
pub use selector::SelectorSet;

use anyhow::{Context, Result};
use layout::{BoxInput, FlowCursor, InlineStyle};
use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Handle to an element of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(usize);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<ElementId>,
    text_content: String,
    rendered_text: String,
    rect: Rect,
    position: Position,
    removed: bool,
}

pub struct Document {
    html: Html,
    elements: Vec<ElementData>,
    base_url: Option<Url>,
    viewport: Viewport,
}

impl Document {
    pub fn parse(source: &str, viewport: Viewport) -> Self {
        let html = Html::parse_document(source);
        let mut elements = Vec::new();
        let mut flow = FlowCursor::new(viewport);
        collect_element(html.root_element(), None, false, &mut flow, &mut elements);

        let base_url = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "base")
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| Url::parse(href).ok());

        debug!(elements = elements.len(), "Parsed document");
        Self {
            html,
            elements,
            base_url,
            viewport,
        }
    }

    /// Read and parse an HTML file; relative URLs resolve against its path.
    pub fn load(path: &Path, viewport: Viewport) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Reading page {}", path.display()))?;
        let mut document = Document::parse(&source, viewport);
        if document.base_url.is_none() {
            let absolute = fs::canonicalize(path)
                .with_context(|| format!("Resolving page path {}", path.display()))?;
            document.base_url = Url::from_file_path(&absolute).ok();
        }
        info!(
            path = %path.display(),
            elements = document.elements.len(),
            "Loaded page"
        );
        Ok(document)
    }

    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Number of elements ever parsed, removed ones included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `id` still refers to an element attached to the document.
    pub fn contains(&self, id: ElementId) -> bool {
        self.live(id).is_some()
    }

    fn live(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(id.0).filter(|data| !data.removed)
    }

    fn live_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.elements.get_mut(id.0).filter(|data| !data.removed)
    }

    pub fn tag_name(&self, id: ElementId) -> Option<&str> {
        self.live(id).map(|data| data.tag.as_str())
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.live(id)?
            .attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.live(id)?.parent
    }

    /// All descendant text, hidden or not.
    pub fn text_content(&self, id: ElementId) -> Option<&str> {
        self.live(id).map(|data| data.text_content.as_str())
    }

    /// Text as it would be rendered: hidden subtrees skipped, block boundaries
    /// separated by whitespace.
    pub fn rendered_text(&self, id: ElementId) -> Option<&str> {
        self.live(id).map(|data| data.rendered_text.as_str())
    }

    /// Box in document coordinates.
    pub fn bounding_box(&self, id: ElementId) -> Option<Rect> {
        self.live(id).map(|data| data.rect)
    }

    /// Box relative to the current viewport scroll position.
    pub fn client_rect(&self, id: ElementId) -> Option<Rect> {
        self.bounding_box(id)
            .map(|rect| rect.translated(0.0, -self.viewport.scroll_y))
    }

    pub fn position(&self, id: ElementId) -> Option<Position> {
        self.live(id).map(|data| data.position)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Live elements matching `selectors`, in document order.
    pub fn query(&self, selectors: &SelectorSet) -> Vec<ElementId> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .enumerate()
            .filter(|(_, element)| selectors.matches(element))
            .map(|(idx, _)| ElementId(idx))
            .filter(|id| self.contains(*id))
            .collect()
    }

    pub fn query_first(&self, selectors: &SelectorSet) -> Option<ElementId> {
        self.query(selectors).into_iter().next()
    }

    pub fn matches(&self, id: ElementId, selectors: &SelectorSet) -> bool {
        self.contains(id)
            && self
                .element_ref(id)
                .is_some_and(|element| selectors.matches(&element))
    }

    /// Nearest ancestor-or-self matching `selectors`.
    pub fn closest(&self, id: ElementId, selectors: &SelectorSet) -> Option<ElementId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if self.matches(current, selectors) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    fn element_ref(&self, id: ElementId) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .nth(id.0)
    }

    /// Detach an element and its subtree. Returns false for stale handles.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut removed = 0usize;
        for idx in id.0..self.elements.len() {
            let candidate = ElementId(idx);
            if idx != id.0 && !self.is_descendant_of(candidate, id) {
                // Subtrees are contiguous in document order.
                break;
            }
            self.elements[idx].removed = true;
            removed += 1;
        }
        debug!(element = %id, removed, "Removed element subtree");
        true
    }

    fn is_descendant_of(&self, candidate: ElementId, ancestor: ElementId) -> bool {
        let mut cursor = self.elements.get(candidate.0).and_then(|data| data.parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.elements.get(current.0).and_then(|data| data.parent);
        }
        false
    }

    /// Replace an element's text, as a script editing the page would.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        let Some(data) = self.live_mut(id) else {
            return false;
        };
        data.text_content = text.to_string();
        data.rendered_text = if data.rect.is_empty() {
            String::new()
        } else {
            text.to_string()
        };
        true
    }

    pub fn set_layout(&mut self, id: ElementId, rect: Rect) -> bool {
        match self.live_mut(id) {
            Some(data) => {
                data.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: ElementId, position: Position) -> bool {
        match self.live_mut(id) {
            Some(data) => {
                data.position = position;
                true
            }
            None => false,
        }
    }

    fn content_height(&self) -> f32 {
        self.elements
            .iter()
            .filter(|data| !data.removed)
            .map(|data| data.rect.bottom())
            .fold(0.0, f32::max)
    }

    /// Scroll so the element is visible; returns the new scroll offset.
    pub fn scroll_into_view(&mut self, id: ElementId, align: ScrollAlign) -> Option<f32> {
        let rect = self.bounding_box(id)?;
        let target = match align {
            ScrollAlign::Start => rect.y,
            ScrollAlign::Center => rect.y + rect.height / 2.0 - self.viewport.height / 2.0,
        };
        let max_scroll = (self.content_height() - self.viewport.height).max(0.0);
        self.viewport.scroll_y = target.clamp(0.0, max_scroll);
        Some(self.viewport.scroll_y)
    }
}

fn collect_element(
    element: ElementRef<'_>,
    parent: Option<ElementId>,
    parent_hidden: bool,
    flow: &mut FlowCursor,
    out: &mut Vec<ElementData>,
) {
    let value = element.value();
    let tag = value.name().to_ascii_lowercase();
    let style = InlineStyle::parse(value.attr("style").unwrap_or_default());
    let hidden = parent_hidden || layout::is_hidden(&tag, value.attr("hidden").is_some(), &style);

    let text_content: String = element.text().collect();
    let mut rendered_text = String::new();
    if !hidden {
        collect_rendered_text(element, &mut rendered_text);
    }
    let has_direct_text = element.children().any(|child| match child.value() {
        Node::Text(text) => !text.trim().is_empty(),
        _ => false,
    });

    let has_flow_descendants = element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|child| {
            let value = child.value();
            let style = InlineStyle::parse(value.attr("style").unwrap_or_default());
            layout::is_flow_box(value.name())
                && !layout::is_hidden(value.name(), value.attr("hidden").is_some(), &style)
        });

    let rect = flow.place(BoxInput {
        tag: &tag,
        style: &style,
        width_attr: value.attr("width").and_then(|w| w.trim().parse().ok()),
        height_attr: value.attr("height").and_then(|h| h.trim().parse().ok()),
        rendered_chars: rendered_text.split_whitespace().map(str::len).sum(),
        has_direct_text,
        has_flow_descendants,
        hidden,
    });

    let id = ElementId(out.len());
    out.push(ElementData {
        tag,
        attributes: value
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        parent,
        text_content,
        rendered_text,
        rect,
        position: style.position.unwrap_or_default(),
        removed: false,
    });

    for child in element.children().filter_map(ElementRef::wrap) {
        collect_element(child, Some(id), hidden, flow, out);
    }
}

fn collect_rendered_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&**text),
            Node::Element(value) => {
                let tag = value.name();
                let style = InlineStyle::parse(value.attr("style").unwrap_or_default());
                if layout::is_hidden(tag, value.attr("hidden").is_some(), &style) {
                    continue;
                }
                if tag == "br" {
                    out.push(' ');
                    continue;
                }
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = layout::is_block(tag);
                if block {
                    out.push(' ');
                }
                collect_rendered_text(child_element, out);
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
