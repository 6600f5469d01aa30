//! Line-oriented host event loop.
//!
//! Each input line is one host event: a key chord (`p`, `ctrl+space`,
//! `arrowdown`), `click <css>`, `remove <css>`, `edit <css> <text>`,
//! `set <key> <value>` for settings-panel writes, `status`, or `quit`.
//! Blank lines and `#` comments are skipped. Every handled event is echoed
//! as one JSON line carrying the session snapshot.

use crate::controller::{Controller, Disposition, KeyPress};
use crate::dom::{Document, SelectorSet};
use crate::session::SessionSnapshot;
use crate::settings::{parse_panel_value, persist_setting};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum HostEvent {
    Key(KeyPress),
    Click(SelectorSet),
    Remove(SelectorSet),
    Edit { target: SelectorSet, text: String },
    Set { key: String, value: String },
    Status,
    Quit,
}

impl HostEvent {
    /// `Ok(None)` for lines that carry no event.
    pub fn parse(line: &str) -> Result<Option<HostEvent>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let event = match head.to_ascii_lowercase().as_str() {
            "quit" | "exit" => HostEvent::Quit,
            "status" => HostEvent::Status,
            "click" => HostEvent::Click(SelectorSet::parse(required(rest, "click")?)?),
            "remove" => HostEvent::Remove(SelectorSet::parse(required(rest, "remove")?)?),
            "edit" => {
                let (selector, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("Usage: edit <selector> <text>"))?;
                HostEvent::Edit {
                    target: SelectorSet::parse(selector)?,
                    text: text.trim().to_string(),
                }
            }
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("Usage: set <key> <value>"))?;
                HostEvent::Set {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                }
            }
            _ => HostEvent::Key(line.parse()?),
        };
        Ok(Some(event))
    }
}

fn required<'a>(rest: &'a str, command: &str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(anyhow!("Usage: {command} <selector>"))
    } else {
        Ok(rest)
    }
}

/// One echoed line of output.
#[derive(Debug, Serialize)]
pub struct LoopEvent {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    pub snapshot: SessionSnapshot,
}

pub struct EventLoop {
    controller: Controller,
    document: Document,
    settings_path: PathBuf,
}

impl EventLoop {
    pub fn new(controller: Controller, document: Document, settings_path: PathBuf) -> Self {
        Self {
            controller,
            document,
            settings_path,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Process events until `quit` or end of input, then let the last
    /// debounced narration finish.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("Reading host events")? {
            let event = match HostEvent::parse(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => {
                    warn!(%line, "Ignoring event: {err:#}");
                    continue;
                }
            };
            if matches!(event, HostEvent::Quit) {
                info!("Quit requested");
                break;
            }
            if let Some(echo) = self.handle(event).await {
                let mut payload = serde_json::to_string(&echo).context("Serializing event")?;
                payload.push('\n');
                output
                    .write_all(payload.as_bytes())
                    .await
                    .context("Writing event output")?;
                output.flush().await.context("Flushing event output")?;
            }
        }

        let settle = self.controller.speech().delay() + Duration::from_millis(50);
        tokio::time::sleep(settle).await;
        self.controller.speech().stop();
        Ok(())
    }

    pub async fn handle(&mut self, event: HostEvent) -> Option<LoopEvent> {
        let (action, disposition) = match event {
            HostEvent::Key(press) => {
                let disposition = self.controller.handle_key(&mut self.document, &press).await;
                ("key", Some(disposition))
            }
            HostEvent::Click(selectors) => {
                let Some(target) = self.document.query_first(&selectors) else {
                    warn!(selectors = %selectors, "Click target not found");
                    return None;
                };
                let disposition = self.controller.handle_click(&mut self.document, target).await;
                ("click", Some(disposition))
            }
            HostEvent::Remove(selectors) => {
                let removed = self
                    .document
                    .query(&selectors)
                    .into_iter()
                    .filter(|id| self.document.remove(*id))
                    .count();
                debug!(selectors = %selectors, removed, "Removed elements");
                self.controller.drop_stale_highlight(&self.document);
                ("remove", None)
            }
            HostEvent::Edit { target, text } => {
                match self.document.query_first(&target) {
                    Some(id) => {
                        self.document.set_text(id, &text);
                    }
                    None => warn!(selectors = %target, "Edit target not found"),
                }
                ("edit", None)
            }
            HostEvent::Set { key, value } => {
                let value = parse_panel_value(&value);
                if let Err(err) = persist_setting(&self.settings_path, &key, value.clone()).await {
                    warn!(%key, "Failed to persist setting: {err:#}");
                }
                if let Err(err) = self.controller.speech().settings().apply(&key, &value) {
                    warn!(%key, "Rejected setting: {err:#}");
                }
                ("set", None)
            }
            HostEvent::Status => ("status", None),
            HostEvent::Quit => return None,
        };
        Some(LoopEvent {
            action,
            disposition,
            snapshot: self.controller.snapshot(&self.document),
        })
    }
}
