//! Static layout estimate for parsed pages.
//!
//! There is no rendering engine behind the narrator, so element boxes are
//! estimated from a simple top-to-bottom flow: text blocks stack vertically,
//! inline runs sit on their block's line, replaced elements (images, form
//! controls) get intrinsic sizes. Inline `style` declarations for `display`,
//! `position`, `width` and `height` are honored. Hosts with real layout can
//! override any box through [`crate::dom::Document::set_layout`].

use serde::Serialize;

pub(crate) const LINE_HEIGHT: f32 = 24.0;
const AVERAGE_CHAR_WIDTH: f32 = 8.0;
const DEFAULT_IMAGE_WIDTH: f32 = 300.0;
const DEFAULT_IMAGE_HEIGHT: f32 = 150.0;
const CONTROL_HEIGHT: f32 = 32.0;
const CONTROL_MIN_WIDTH: f32 = 64.0;

const NEVER_RENDERED: &[&str] = &[
    "head", "script", "style", "template", "noscript", "title", "meta", "link", "base",
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "td", "th", "thead", "tr", "ul",
];

const REPLACED_TAGS: &[&str] = &[
    "img", "input", "button", "select", "textarea", "video", "canvas", "iframe", "svg",
];

/// Axis-aligned box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the box has no visible area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// CSS `position` values the narrator distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "static" => Some(Position::Static),
            "relative" => Some(Position::Relative),
            "absolute" => Some(Position::Absolute),
            "fixed" => Some(Position::Fixed),
            "sticky" | "-webkit-sticky" => Some(Position::Sticky),
            _ => None,
        }
    }

    /// Fixed and sticky boxes belong to page chrome rather than content.
    pub fn is_pinned(self) -> bool {
        matches!(self, Position::Fixed | Position::Sticky)
    }
}

/// Where a scrolled-to element should land in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    Start,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            scroll_y: 0.0,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1280.0, 720.0)
    }
}

/// The subset of an inline `style` attribute that affects layout here.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct InlineStyle {
    pub display_none: bool,
    pub position: Option<Position>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl InlineStyle {
    pub fn parse(raw: &str) -> Self {
        let mut style = InlineStyle::default();
        for declaration in raw.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();
            match name.as_str() {
                "display" => style.display_none = value == "none",
                "position" => style.position = Position::parse(&value),
                "width" => style.width = parse_length(&value),
                "height" => style.height = parse_length(&value),
                _ => {}
            }
        }
        style
    }
}

fn parse_length(raw: &str) -> Option<f32> {
    let number = raw.strip_suffix("px").unwrap_or(raw).trim();
    number.parse::<f32>().ok().filter(|value| value.is_finite() && *value >= 0.0)
}

pub(crate) fn is_hidden(tag: &str, hidden_attr: bool, style: &InlineStyle) -> bool {
    hidden_attr || style.display_none || NEVER_RENDERED.contains(&tag)
}

pub(crate) fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

fn is_replaced(tag: &str) -> bool {
    REPLACED_TAGS.contains(&tag)
}

/// Boxes that take their own vertical space in the flow.
pub(crate) fn is_flow_box(tag: &str) -> bool {
    is_block(tag) || is_replaced(tag)
}

/// What the flow needs to know about one element.
pub(crate) struct BoxInput<'a> {
    pub tag: &'a str,
    pub style: &'a InlineStyle,
    pub width_attr: Option<f32>,
    pub height_attr: Option<f32>,
    pub rendered_chars: usize,
    pub has_direct_text: bool,
    /// A visible block or replaced element somewhere below this one.
    pub has_flow_descendants: bool,
    pub hidden: bool,
}

/// Running vertical cursor over the document.
pub(crate) struct FlowCursor {
    y: f32,
    block_y: f32,
    width: f32,
}

impl FlowCursor {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            y: 0.0,
            block_y: 0.0,
            width: viewport.width,
        }
    }

    pub fn place(&mut self, input: BoxInput<'_>) -> Rect {
        if input.hidden {
            return Rect::ZERO;
        }
        let chars = input.rendered_chars as f32;
        let (natural_width, natural_height, advances) = if is_replaced(input.tag) {
            if input.tag == "img" {
                (
                    input.width_attr.unwrap_or(DEFAULT_IMAGE_WIDTH),
                    input.height_attr.unwrap_or(DEFAULT_IMAGE_HEIGHT),
                    true,
                )
            } else {
                (
                    (chars * AVERAGE_CHAR_WIDTH + 16.0).max(CONTROL_MIN_WIDTH),
                    CONTROL_HEIGHT,
                    true,
                )
            }
        } else if is_block(input.tag) {
            let height = self.text_height(input.rendered_chars);
            // Blocks holding only inline content own their lines.
            let owns_lines = input.has_direct_text
                || (input.rendered_chars > 0 && !input.has_flow_descendants);
            (self.width, height, owns_lines)
        } else {
            let width = (chars * AVERAGE_CHAR_WIDTH).min(self.width);
            let height = if input.rendered_chars == 0 { 0.0 } else { LINE_HEIGHT };
            (width, height, false)
        };

        let width = input.style.width.unwrap_or(natural_width);
        let height = input.style.height.unwrap_or(natural_height);
        let y = if is_block(input.tag) || is_replaced(input.tag) {
            self.y
        } else {
            self.block_y
        };
        if is_block(input.tag) {
            self.block_y = y;
        }
        if advances {
            self.y += height;
        }
        Rect::new(0.0, y, width, height)
    }

    fn text_height(&self, chars: usize) -> f32 {
        if chars == 0 {
            return 0.0;
        }
        let per_line = (self.width / AVERAGE_CHAR_WIDTH).max(1.0) as usize;
        chars.div_ceil(per_line) as f32 * LINE_HEIGHT
    }
}
