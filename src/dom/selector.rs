use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

/// A parsed CSS selector list together with the text it came from.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    source: String,
    selector: Selector,
}

impl SelectorSet {
    pub fn parse(source: &str) -> Result<Self> {
        let selector = Selector::parse(source)
            .map_err(|err| anyhow!("Invalid selector `{source}`: {err:?}"))?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.selector.matches(element)
    }
}

impl std::fmt::Display for SelectorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

fn builtin(source: &str) -> SelectorSet {
    SelectorSet::parse(source).unwrap()
}

pub static PARAGRAPHS: Lazy<SelectorSet> = Lazy::new(|| builtin("p"));
pub static HEADINGS: Lazy<SelectorSet> = Lazy::new(|| builtin("h1, h2, h3, h4, h5, h6"));
pub static LINKS: Lazy<SelectorSet> = Lazy::new(|| builtin("a[href]"));
pub static BUTTONS: Lazy<SelectorSet> = Lazy::new(|| {
    builtin("button, [role='button'], input[type='button'], input[type='submit']")
});
pub static LANDMARKS: Lazy<SelectorSet> =
    Lazy::new(|| builtin("main, nav, footer, aside, section"));
pub static IMAGES: Lazy<SelectorSet> = Lazy::new(|| builtin("img"));
/// Elements a pointer click can select for narration.
pub static NARRATABLE: Lazy<SelectorSet> =
    Lazy::new(|| builtin("p, h1, h2, h3, h4, h5, h6, a, button"));
pub static MAIN_ELEMENT: Lazy<SelectorSet> = Lazy::new(|| builtin("main"));
pub static MAIN_ROLE: Lazy<SelectorSet> = Lazy::new(|| builtin("[role='main']"));
