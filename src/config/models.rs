use super::defaults::*;
use serde::{Deserialize, Serialize};

/// High-level narrator configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    /// Key/value file shared with the settings panel.
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
    #[serde(default = "default_speech_debounce_ms")]
    pub speech_debounce_ms: u64,
    #[serde(default)]
    pub speech_backend: SpeechBackendKind,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: HighlightColor,
    #[serde(default = "default_highlight_border_px")]
    pub highlight_border_px: f32,
    #[serde(default = "default_key_toggle_mode")]
    pub key_toggle_mode: String,
    #[serde(default = "default_key_next_paragraph")]
    pub key_next_paragraph: String,
    #[serde(default = "default_key_next_heading")]
    pub key_next_heading: String,
    #[serde(default = "default_key_next_link")]
    pub key_next_link: String,
    #[serde(default = "default_key_next_button")]
    pub key_next_button: String,
    #[serde(default = "default_key_next_landmark")]
    pub key_next_landmark: String,
    #[serde(default = "default_key_skip_to_main")]
    pub key_skip_to_main: String,
    #[serde(default = "default_key_next_image")]
    pub key_next_image: String,
    #[serde(default = "default_key_next_sentence")]
    pub key_next_sentence: String,
    #[serde(default = "default_key_prev_sentence")]
    pub key_prev_sentence: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: default_log_level(),
            settings_path: default_settings_path(),
            speech_debounce_ms: default_speech_debounce_ms(),
            speech_backend: SpeechBackendKind::default(),
            speech_command: default_speech_command(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            highlight_color: default_highlight_color(),
            highlight_border_px: default_highlight_border_px(),
            key_toggle_mode: default_key_toggle_mode(),
            key_next_paragraph: default_key_next_paragraph(),
            key_next_heading: default_key_next_heading(),
            key_next_link: default_key_next_link(),
            key_next_button: default_key_next_button(),
            key_next_landmark: default_key_next_landmark(),
            key_skip_to_main: default_key_skip_to_main(),
            key_next_image: default_key_next_image(),
            key_next_sentence: default_key_next_sentence(),
            key_prev_sentence: default_key_prev_sentence(),
        }
    }
}

/// Where utterances go.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SpeechBackendKind {
    /// Log utterances instead of voicing them.
    #[default]
    Log,
    /// Hand each utterance to an external synthesizer process.
    Command,
}

impl std::fmt::Display for SpeechBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SpeechBackendKind::Log => "log",
            SpeechBackendKind::Command => "command",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct HighlightColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
