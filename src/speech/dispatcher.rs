use super::{SpeechBackend, Utterance};
use crate::cancellation::CancellationToken;
use crate::settings::SettingsStore;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Routes narration requests to the backend.
///
/// A new utterance always cancels the one in flight. Debounced requests wait
/// for a quiet period first and are dropped when a newer request arrives in
/// the meantime, so a burst of key repeats only speaks its last text.
#[derive(Clone)]
pub struct SpeechDispatcher {
    backend: Arc<Mutex<Box<dyn SpeechBackend>>>,
    settings: SettingsStore,
    delay: Duration,
    pending: Arc<Mutex<Option<CancellationToken>>>,
}

impl SpeechDispatcher {
    pub fn new(backend: Box<dyn SpeechBackend>, settings: SettingsStore, delay: Duration) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            settings,
            delay,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Speak now. Returns whether anything was handed to the backend.
    pub fn speak(&self, text: &str) -> bool {
        if !self.settings.is_enabled() {
            trace!(%text, "Speech disabled; dropping");
            return false;
        }
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        let utterance = Utterance::new(text, &self.settings.snapshot());
        let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
        backend.cancel();
        if let Err(err) = backend.speak(&utterance) {
            warn!(%text, "Speech backend failed: {err:#}");
            return false;
        }
        debug!(%text, "Dispatched utterance");
        true
    }

    /// Speak after the debounce delay unless superseded. Must be called from
    /// within a tokio runtime.
    pub fn speak_debounced(&self, text: impl Into<String>) {
        let text = text.into();
        let token = CancellationToken::new();
        if let Some(previous) = self.replace_pending(Some(token.clone())) {
            previous.cancel();
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(dispatcher.delay).await;
            if token.is_cancelled() {
                trace!(%text, "Debounced utterance superseded");
                return;
            }
            dispatcher.speak(&text);
        });
    }

    /// Drop a pending debounced request, if any.
    pub fn cancel_pending(&self) {
        if let Some(previous) = self.replace_pending(None) {
            previous.cancel();
        }
    }

    /// Drop pending requests and silence the backend.
    pub fn stop(&self) {
        self.cancel_pending();
        self.backend
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    fn replace_pending(&self, token: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *pending, token)
    }
}
