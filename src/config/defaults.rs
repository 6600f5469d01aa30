pub(crate) fn default_settings_path() -> String {
    "conf/settings.toml".to_string()
}

pub(crate) fn default_speech_debounce_ms() -> u64 {
    200
}

pub(crate) fn default_speech_command() -> String {
    "espeak-ng".to_string()
}

pub(crate) fn default_viewport_width() -> f32 {
    1280.0
}

pub(crate) fn default_viewport_height() -> f32 {
    720.0
}

pub(crate) fn default_highlight_color() -> crate::config::HighlightColor {
    crate::config::HighlightColor {
        r: 1.0,
        g: 1.0,
        b: 0.0,
        a: 0.15,
    }
}

pub(crate) fn default_highlight_border_px() -> f32 {
    3.0
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}

pub(crate) fn default_key_toggle_mode() -> String {
    "ctrl+space".to_string()
}

pub(crate) fn default_key_next_paragraph() -> String {
    "p".to_string()
}

pub(crate) fn default_key_next_heading() -> String {
    "h".to_string()
}

pub(crate) fn default_key_next_link() -> String {
    "l".to_string()
}

pub(crate) fn default_key_next_button() -> String {
    "b".to_string()
}

pub(crate) fn default_key_next_landmark() -> String {
    "d".to_string()
}

pub(crate) fn default_key_skip_to_main() -> String {
    "m".to_string()
}

pub(crate) fn default_key_next_image() -> String {
    "g".to_string()
}

pub(crate) fn default_key_next_sentence() -> String {
    "arrowdown".to_string()
}

pub(crate) fn default_key_prev_sentence() -> String {
    "arrowup".to_string()
}
