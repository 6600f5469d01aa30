//! Keyboard input as the controller sees it.

use anyhow::{Result, anyhow};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKey {
    Space,
    Enter,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl NamedKey {
    pub fn token(self) -> &'static str {
        match self {
            NamedKey::Space => "space",
            NamedKey::Enter => "enter",
            NamedKey::Escape => "escape",
            NamedKey::Tab => "tab",
            NamedKey::ArrowUp => "arrowup",
            NamedKey::ArrowDown => "arrowdown",
            NamedKey::ArrowLeft => "arrowleft",
            NamedKey::ArrowRight => "arrowright",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "space" | "spacebar" => Some(NamedKey::Space),
            "enter" | "return" => Some(NamedKey::Enter),
            "escape" | "esc" => Some(NamedKey::Escape),
            "tab" => Some(NamedKey::Tab),
            "arrowup" | "up" => Some(NamedKey::ArrowUp),
            "arrowdown" | "down" => Some(NamedKey::ArrowDown),
            "arrowleft" | "left" => Some(NamedKey::ArrowLeft),
            "arrowright" | "right" => Some(NamedKey::ArrowRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(String),
    Named(NamedKey),
}

impl Key {
    /// Case-folded name used for shortcut matching.
    pub fn token(&self) -> String {
        match self {
            Key::Character(ch) => ch.to_lowercase(),
            Key::Named(named) => named.token().to_string(),
        }
    }

    pub(crate) fn from_token(token: &str) -> Self {
        let lowered = token.to_ascii_lowercase();
        match NamedKey::from_token(&lowered) {
            Some(named) => Key::Named(named),
            None => Key::Character(token.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub logo: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        logo: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Consume a modifier name; false if `token` is not one.
    pub(crate) fn absorb(&mut self, token: &str) -> bool {
        match token {
            "ctrl" | "control" => self.ctrl = true,
            "alt" | "option" => self.alt = true,
            "shift" => self.shift = true,
            "logo" | "meta" | "super" | "cmd" | "command" => self.logo = true,
            _ => return false,
        }
        true
    }
}

/// One key-down event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn character(ch: &str) -> Self {
        Self::new(Key::Character(ch.to_string()), Modifiers::NONE)
    }

    pub fn named(key: NamedKey) -> Self {
        Self::new(Key::Named(key), Modifiers::NONE)
    }
}

impl FromStr for KeyPress {
    type Err = anyhow::Error;

    /// Parses chords such as `p`, `Shift+H`, `ctrl+space`, `arrowdown`.
    fn from_str(raw: &str) -> Result<Self> {
        let mut modifiers = Modifiers::NONE;
        let mut key: Option<Key> = None;
        for token in raw.split('+').map(str::trim).filter(|s| !s.is_empty()) {
            if modifiers.absorb(&token.to_ascii_lowercase()) {
                continue;
            }
            if key.is_some() {
                return Err(anyhow!("Key chord `{raw}` names more than one key"));
            }
            key = Some(Key::from_token(token));
        }
        let key = key.ok_or_else(|| anyhow!("Key chord `{raw}` names no key"))?;
        Ok(KeyPress::new(key, modifiers))
    }
}
