use super::keys::{Key, KeyPress, Modifiers};
use super::Command;
use crate::config::AppConfig;
use tracing::debug;

/// A configured key chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    key: String,
    modifiers: Modifiers,
}

impl Shortcut {
    /// Parse a binding such as `ctrl+space`; blank bindings use `fallback`.
    pub fn parse(raw: &str, fallback: &str) -> Self {
        let normalized = normalize_shortcut_token(raw, fallback);

        let mut modifiers = Modifiers::NONE;
        let mut required_key: Option<&str> = None;
        for token in normalized
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            if !modifiers.absorb(token) {
                required_key = Some(token);
            }
        }

        let key = required_key
            .map(|token| Key::from_token(token).token())
            .unwrap_or_else(|| fallback.to_string());
        Self { key, modifiers }
    }

    /// Exact modifier match, except that an unrequested shift is tolerated on
    /// character keys so letter shortcuts stay case-insensitive.
    pub fn matches(&self, press: &KeyPress) -> bool {
        if press.key.token() != self.key {
            return false;
        }
        let pressed = press.modifiers;
        let shift_ok = pressed.shift == self.modifiers.shift
            || (!self.modifiers.shift && matches!(press.key, Key::Character(_)));
        pressed.ctrl == self.modifiers.ctrl
            && pressed.alt == self.modifiers.alt
            && pressed.logo == self.modifiers.logo
            && shift_ok
    }
}

fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized.replace("spacebar", "space")
    }
}

/// Ordered shortcut table; the first matching binding wins.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(Shortcut, Command)>,
}

impl Keymap {
    pub fn from_config(config: &AppConfig) -> Self {
        let bindings = vec![
            (Shortcut::parse(&config.key_toggle_mode, "ctrl+space"), Command::ToggleMode),
            (Shortcut::parse(&config.key_next_paragraph, "p"), Command::NextParagraph),
            (Shortcut::parse(&config.key_next_heading, "h"), Command::NextHeading),
            (Shortcut::parse(&config.key_next_link, "l"), Command::NextLink),
            (Shortcut::parse(&config.key_next_button, "b"), Command::NextButton),
            (Shortcut::parse(&config.key_next_landmark, "d"), Command::NextLandmark),
            (Shortcut::parse(&config.key_skip_to_main, "m"), Command::SkipToMain),
            (Shortcut::parse(&config.key_next_image, "g"), Command::NextImage),
            (Shortcut::parse(&config.key_next_sentence, "arrowdown"), Command::NextSentence),
            (Shortcut::parse(&config.key_prev_sentence, "arrowup"), Command::PrevSentence),
        ];
        debug!(bindings = bindings.len(), "Built keymap");
        Self { bindings }
    }

    pub fn command_for(&self, press: &KeyPress) -> Option<Command> {
        self.bindings
            .iter()
            .find(|(shortcut, _)| shortcut.matches(press))
            .map(|(_, command)| *command)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Keymap::from_config(&AppConfig::default())
    }
}
