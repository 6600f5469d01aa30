//! Top-level input handling.
//!
//! Key presses and clicks are mapped to a [`Command`], reduced against the
//! [`Session`] into a list of [`Effect`]s, and the effects are then run in
//! order. All synchronous work (focus, highlight, scroll) is done before any
//! debounced speech fires.

pub mod keys;
mod reducer;
mod shortcuts;

pub use keys::{Key, KeyPress, Modifiers, NamedKey};
pub use shortcuts::{Keymap, Shortcut};

use crate::config::AppConfig;
use crate::describe::{ImageDescriber, ImageSource};
use crate::dom::{Document, ElementId, ScrollAlign};
use crate::highlight::HighlightStyle;
use crate::session::{Mode, Session, SessionSnapshot};
use crate::speech::SpeechDispatcher;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const NO_MORE_LANDMARKS: &str = "No more landmarks";
pub const MAIN_CONTENT: &str = "Main content";
pub const MAIN_CONTENT_NOT_FOUND: &str = "Main content not found";
pub const NO_IMAGES_FOUND: &str = "No images found";
pub const GENERATING_DESCRIPTION: &str = "Generating image description";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleMode,
    NextParagraph,
    NextHeading,
    NextLink,
    NextButton,
    NextLandmark,
    SkipToMain,
    NextImage,
    NextSentence,
    PrevSentence,
    /// Pointer selection of a narratable element.
    Select(ElementId),
}

/// What happened to the input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Handled; the page's default action is suppressed.
    Consumed,
    /// Left for the page.
    PassThrough,
}

/// Work that must be performed outside the reducer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    Highlight(ElementId),
    Speak(String),
    SpeakDebounced(String),
    ScrollIntoView { element: ElementId, align: ScrollAlign },
    DescribeImage(ElementId),
}

pub struct Controller {
    session: Session,
    keymap: Keymap,
    speech: SpeechDispatcher,
    describer: Arc<dyn ImageDescriber>,
}

impl Controller {
    pub fn new(
        config: &AppConfig,
        speech: SpeechDispatcher,
        describer: Arc<dyn ImageDescriber>,
    ) -> Self {
        let style = HighlightStyle {
            color: config.highlight_color,
            border_px: config.highlight_border_px,
        };
        Self {
            session: Session::new(style),
            keymap: Keymap::from_config(config),
            speech,
            describer,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn speech(&self) -> &SpeechDispatcher {
        &self.speech
    }

    pub fn snapshot(&self, doc: &Document) -> SessionSnapshot {
        self.session.snapshot(doc)
    }

    /// Forget the highlight if the page removed its element.
    pub fn drop_stale_highlight(&mut self, doc: &Document) {
        if self.session.drop_stale_highlight(doc) {
            debug!("Cleared highlight of a removed element");
        }
    }

    pub async fn handle_key(&mut self, doc: &mut Document, press: &KeyPress) -> Disposition {
        let Some(command) = self.keymap.command_for(press) else {
            return Disposition::PassThrough;
        };
        if command != Command::ToggleMode && self.session.mode() == Mode::Typing {
            return Disposition::PassThrough;
        }
        debug!(?command, "Key command");
        self.dispatch(doc, command).await;
        Disposition::Consumed
    }

    /// Pointer click on `target`; selects the nearest narratable element.
    pub async fn handle_click(&mut self, doc: &mut Document, target: ElementId) -> Disposition {
        if self.session.mode() == Mode::Typing {
            return Disposition::PassThrough;
        }
        let Some(element) = reducer::click_target(doc, target) else {
            return Disposition::PassThrough;
        };
        self.dispatch(doc, Command::Select(element)).await;
        Disposition::Consumed
    }

    async fn dispatch(&mut self, doc: &mut Document, command: Command) {
        let effects = self.reduce(doc, command);
        for effect in effects {
            self.run_effect(doc, effect).await;
        }
    }

    async fn run_effect(&mut self, doc: &mut Document, effect: Effect) {
        match effect {
            Effect::Highlight(element) => {
                self.session.highlighter_mut().highlight(doc, element);
            }
            Effect::Speak(text) => {
                self.speech.speak(&text);
            }
            Effect::SpeakDebounced(text) => self.speech.speak_debounced(text),
            Effect::ScrollIntoView { element, align } => {
                if let Some(scroll_y) = doc.scroll_into_view(element, align) {
                    debug!(%element, ?align, scroll_y, "Scrolled into view");
                }
            }
            Effect::DescribeImage(element) => {
                let source = ImageSource {
                    src: doc.attribute(element, "src").map(str::to_string),
                    base_url: doc.base_url().cloned(),
                };
                let description = self.describer.describe(source).await;
                info!(%element, %description, "Generated image description");
                self.speech.speak_debounced(description);
            }
        }
    }
}

#[cfg(test)]
mod tests;
