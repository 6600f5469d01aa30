//! Speech preferences shared with the settings panel.
//!
//! Preferences live in a small TOML file holding four keys: `enabled`,
//! `rate`, `pitch` and `volume`. The panel writes to that file; the narrator
//! reads it once at startup and applies any later panel writes it is told
//! about. Values may be stored as native TOML types or as strings, since the
//! panel forwards raw control values.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

pub const KEY_ENABLED: &str = "enabled";
pub const KEY_RATE: &str = "rate";
pub const KEY_PITCH: &str = "pitch";
pub const KEY_VOLUME: &str = "volume";

const RATE_RANGE: (f32, f32) = (0.1, 10.0);
const PITCH_RANGE: (f32, f32) = (0.0, 2.0);
const VOLUME_RANGE: (f32, f32) = (0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Settings {
    pub enabled: bool,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl Settings {
    /// Apply one stored key. Unknown keys and unusable values are reported
    /// as errors and leave the settings untouched.
    pub fn apply(&mut self, key: &str, value: &toml::Value) -> Result<()> {
        match key {
            KEY_ENABLED => self.enabled = as_bool(value)?,
            KEY_RATE => self.rate = clamp_range(as_number(value)?, RATE_RANGE),
            KEY_PITCH => self.pitch = clamp_range(as_number(value)?, PITCH_RANGE),
            KEY_VOLUME => self.volume = clamp_range(as_number(value)?, VOLUME_RANGE),
            other => return Err(anyhow!("Unknown setting `{other}`")),
        }
        Ok(())
    }
}

fn clamp_range(value: f32, (min, max): (f32, f32)) -> f32 {
    value.clamp(min, max)
}

fn as_bool(value: &toml::Value) -> Result<bool> {
    match value {
        toml::Value::Boolean(flag) => Ok(*flag),
        toml::Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => Ok(true),
            "false" | "0" | "off" => Ok(false),
            _ => Err(anyhow!("Expected a boolean, got `{raw}`")),
        },
        toml::Value::Integer(number) => Ok(*number != 0),
        other => Err(anyhow!("Expected a boolean, got {other}")),
    }
}

fn as_number(value: &toml::Value) -> Result<f32> {
    let number = match value {
        toml::Value::Float(number) => *number as f32,
        toml::Value::Integer(number) => *number as f32,
        toml::Value::String(raw) => raw
            .trim()
            .parse::<f32>()
            .with_context(|| format!("Expected a number, got `{raw}`"))?,
        other => return Err(anyhow!("Expected a number, got {other}")),
    };
    if number.is_finite() {
        Ok(number)
    } else {
        Err(anyhow!("Expected a finite number, got {number}"))
    }
}

/// Interpret a raw control value the way the panel would have stored it.
pub fn parse_panel_value(raw: &str) -> toml::Value {
    let trimmed = raw.trim();
    if let Ok(flag) = trimmed.parse::<bool>() {
        return toml::Value::Boolean(flag);
    }
    if let Ok(number) = trimmed.parse::<f64>() {
        return toml::Value::Float(number);
    }
    toml::Value::String(trimmed.to_string())
}

/// Shared handle to the live settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<Settings>>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn snapshot(&self) -> Settings {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_enabled(&self) -> bool {
        self.snapshot().enabled
    }

    /// Apply a single panel write to the live settings.
    pub fn apply(&self, key: &str, value: &toml::Value) -> Result<()> {
        let mut settings = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        settings.apply(key, value)?;
        debug!(key, settings = ?*settings, "Applied setting");
        Ok(())
    }

    /// Merge persisted values over the current ones. A missing or unreadable
    /// file leaves the defaults in place.
    pub async fn load(&self, path: &Path) {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(err) => {
                info!(path = %path.display(), "No stored settings, using defaults: {err}");
                return;
            }
        };
        let table = match contents.parse::<toml::Table>() {
            Ok(table) => table,
            Err(err) => {
                warn!(path = %path.display(), "Invalid settings TOML, using defaults: {err}");
                return;
            }
        };
        let mut applied = 0usize;
        for (key, value) in &table {
            match self.apply(key, value) {
                Ok(()) => applied += 1,
                Err(err) => warn!(%key, "Ignoring stored setting: {err:#}"),
            }
        }
        info!(
            path = %path.display(),
            applied,
            settings = ?self.snapshot(),
            "Loaded stored settings"
        );
    }
}

/// Write one key into the settings file, as the settings panel does.
pub async fn persist_setting(path: &Path, key: &str, value: toml::Value) -> Result<()> {
    let mut table = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents
            .parse::<toml::Table>()
            .with_context(|| format!("Parsing settings file {}", path.display()))?,
        Err(_) => toml::Table::new(),
    };
    table.insert(key.to_string(), value);
    let serialized = toml::to_string(&table).context("Serializing settings")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Creating {}", parent.display()))?;
    }
    tokio::fs::write(path, serialized)
        .await
        .with_context(|| format!("Writing settings file {}", path.display()))?;
    debug!(path = %path.display(), key, "Persisted setting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_settings_path(tag: &str) -> std::path::PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        std::env::temp_dir()
            .join(format!("page-narrator-{tag}-{nonce}"))
            .join("settings.toml")
    }

    #[test]
    fn string_values_are_parsed_and_clamped() {
        let mut settings = Settings::default();
        settings
            .apply(KEY_RATE, &toml::Value::String("2.5".into()))
            .unwrap();
        settings
            .apply(KEY_VOLUME, &toml::Value::String("7".into()))
            .unwrap();
        settings
            .apply(KEY_ENABLED, &toml::Value::String("false".into()))
            .unwrap();
        assert_eq!(settings.rate, 2.5);
        assert_eq!(settings.volume, 1.0);
        assert!(!settings.enabled);
    }

    #[test]
    fn bad_values_leave_settings_untouched() {
        let mut settings = Settings::default();
        assert!(settings
            .apply(KEY_PITCH, &toml::Value::String("high".into()))
            .is_err());
        assert!(settings.apply("voice", &toml::Value::Boolean(true)).is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn panel_values_keep_their_natural_type() {
        assert_eq!(parse_panel_value("true"), toml::Value::Boolean(true));
        assert_eq!(parse_panel_value(" 1.5 "), toml::Value::Float(1.5));
        assert_eq!(
            parse_panel_value("loud"),
            toml::Value::String("loud".to_string())
        );
    }

    #[tokio::test]
    async fn missing_file_keeps_defaults() {
        let store = SettingsStore::default();
        store.load(&temp_settings_path("missing")).await;
        assert_eq!(store.snapshot(), Settings::default());
    }

    #[tokio::test]
    async fn stored_values_merge_over_defaults() {
        let path = temp_settings_path("merge");
        persist_setting(&path, KEY_RATE, toml::Value::String("1.75".into()))
            .await
            .unwrap();
        persist_setting(&path, KEY_ENABLED, toml::Value::Boolean(false))
            .await
            .unwrap();

        let store = SettingsStore::default();
        store.load(&path).await;
        let settings = store.snapshot();
        assert_eq!(settings.rate, 1.75);
        assert!(!settings.enabled);
        assert_eq!(settings.pitch, 1.0);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
