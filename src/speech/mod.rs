//! Speech output.
//!
//! Synthesis itself is delegated to a [`SpeechBackend`]; the
//! [`SpeechDispatcher`] decides what reaches it and when.

mod command;
mod dispatcher;

pub use command::CommandBackend;
pub use dispatcher::SpeechDispatcher;

use crate::settings::Settings;
use anyhow::Result;
use serde::Serialize;
use tracing::info;

/// Text plus the voice parameters it should be spoken with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, settings: &Settings) -> Self {
        Self {
            text: text.into(),
            rate: settings.rate,
            pitch: settings.pitch,
            volume: settings.volume,
        }
    }
}

/// Host speech capability.
pub trait SpeechBackend: Send {
    /// Start speaking; fire and forget.
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;
    /// Stop whatever is currently being spoken.
    fn cancel(&mut self);
}

/// Backend that only logs what would have been said.
#[derive(Debug, Default)]
pub struct LogBackend;

impl SpeechBackend for LogBackend {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        info!(
            text = %utterance.text,
            rate = utterance.rate,
            pitch = utterance.pitch,
            volume = utterance.volume,
            "Speaking"
        );
        Ok(())
    }

    fn cancel(&mut self) {}
}
