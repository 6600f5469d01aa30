use super::{SpeechBackend, Utterance};
use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Speaks through an external espeak-compatible synthesizer.
///
/// Each utterance spawns one child process that reads the text from stdin;
/// cancelling kills the child that is still talking.
pub struct CommandBackend {
    program: String,
    child: Option<Child>,
}

impl CommandBackend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: None,
        }
    }

    /// Command-line flags carrying the voice parameters.
    pub fn args_for(utterance: &Utterance) -> Vec<String> {
        let words_per_minute = (BASE_WORDS_PER_MINUTE * utterance.rate).round().max(1.0);
        let pitch = (utterance.pitch * 50.0).round().clamp(0.0, 99.0);
        let amplitude = (utterance.volume * 100.0).round().clamp(0.0, 200.0);
        vec![
            "-s".to_string(),
            format!("{words_per_minute}"),
            "-p".to_string(),
            format!("{pitch}"),
            "-a".to_string(),
            format!("{amplitude}"),
            "--stdin".to_string(),
        ]
    }

    fn reap(&mut self) {
        if let Some(child) = self.child.as_mut() {
            match child.try_wait() {
                Ok(Some(_)) => self.child = None,
                Ok(None) => {}
                Err(err) => {
                    warn!(program = %self.program, "Failed to poll synthesizer: {err}");
                    self.child = None;
                }
            }
        }
    }
}

impl SpeechBackend for CommandBackend {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.reap();
        let mut child = Command::new(&self.program)
            .args(Self::args_for(utterance))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Spawning synthesizer `{}`", self.program))?;
        let stdin = child.stdin.take();
        debug!(program = %self.program, pid = child.id(), "Synthesizer started");
        self.child = Some(child);
        if let Some(mut stdin) = stdin {
            if let Err(err) = stdin.write_all(utterance.text.as_bytes()) {
                self.cancel();
                return Err(err).context("Writing text to synthesizer");
            }
        }
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                debug!(program = %self.program, "Synthesizer already exited: {err}");
            }
            let _ = child.wait();
        }
    }
}

impl Drop for CommandBackend {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn voice_parameters_map_onto_flags() {
        let settings = Settings {
            rate: 2.0,
            pitch: 0.5,
            volume: 0.4,
            enabled: true,
        };
        let args = CommandBackend::args_for(&Utterance::new("hi", &settings));
        assert_eq!(args, vec!["-s", "350", "-p", "25", "-a", "40", "--stdin"]);
    }

    #[test]
    fn missing_program_reports_an_error() {
        let mut backend = CommandBackend::new("page-narrator-no-such-synth");
        let err = backend
            .speak(&Utterance::new("hi", &Settings::default()))
            .unwrap_err();
        assert!(format!("{err:#}").contains("page-narrator-no-such-synth"));
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_reaps_the_child() {
        // `true` exits without reading, so a write larger than the pipe
        // buffer fails once the read end closes.
        let mut backend = CommandBackend::new("true");
        let text = "word ".repeat(400_000);
        let err = backend
            .speak(&Utterance::new(text, &Settings::default()))
            .unwrap_err();
        assert!(format!("{err:#}").contains("Writing text to synthesizer"));
        assert!(backend.child.is_none());
    }
}
