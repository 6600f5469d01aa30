//! Entry point for the page narrator.
//!
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Load the page and wire the controller to a speech backend.
//! - Feed host events from stdin until `quit` or end of input.

use anyhow::{Context, Result, anyhow};
use page_narrator::config::{AppConfig, SpeechBackendKind, load_config};
use page_narrator::controller::Controller;
use page_narrator::describe::FilenameDescriber;
use page_narrator::dom::{Document, Viewport};
use page_narrator::event_loop::EventLoop;
use page_narrator::settings::SettingsStore;
use page_narrator::speech::{CommandBackend, LogBackend, SpeechBackend, SpeechDispatcher};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let page_path = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %page_path.display(),
        level = %config.log_level,
        backend = %config.speech_backend,
        "Starting page narrator"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build the async runtime")?;
    runtime.block_on(narrate(page_path, config))
}

async fn narrate(page_path: PathBuf, config: AppConfig) -> Result<()> {
    let settings_path = PathBuf::from(&config.settings_path);
    let settings = SettingsStore::default();
    {
        // Narration starts on defaults; stored values land when read.
        let settings = settings.clone();
        let path = settings_path.clone();
        tokio::spawn(async move { settings.load(&path).await });
    }

    let viewport = Viewport::new(config.viewport_width, config.viewport_height);
    let document = Document::load(&page_path, viewport)?;
    info!(elements = document.len(), "Loaded page");

    let backend: Box<dyn SpeechBackend> = match config.speech_backend {
        SpeechBackendKind::Log => Box::new(LogBackend),
        SpeechBackendKind::Command => Box::new(CommandBackend::new(config.speech_command.clone())),
    };
    let speech = SpeechDispatcher::new(
        backend,
        settings,
        Duration::from_millis(config.speech_debounce_ms),
    );
    let controller = Controller::new(&config, speech, Arc::new(FilenameDescriber));

    let mut event_loop = EventLoop::new(controller, document, settings_path);
    let input = BufReader::new(tokio::io::stdin());
    event_loop.run(input, tokio::io::stdout()).await?;
    info!("Narrator stopped");
    Ok(())
}

fn parse_args() -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("Usage: page-narrator <path-to-page.html>"))?;

    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.as_path().display()));
    }
    Ok(path)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
