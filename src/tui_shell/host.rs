//! Prompter and feedback implementations for edits running on worker threads.
//!
//! Each call is forwarded to the UI thread as a [`UiEvent`]; prompts block the
//! worker until the user answers. A dropped reply channel counts as a dismissal.

use std::sync::mpsc::{Sender, channel};

use anyhow::{Result, anyhow};

use crate::portal;
use crate::services::Feedback;
use crate::services::prompt::{InputRequest, PickRequest, Prompter};

use super::{NodeKey, UiEvent};

pub(super) enum PromptRequest {
    Input {
        request: InputRequest,
        reply: Sender<Option<String>>,
    },
    Pick {
        request: PickRequest,
        reply: Sender<Option<Vec<usize>>>,
    },
    Confirm {
        message: String,
        accept: String,
        reply: Sender<bool>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Level {
    Info,
    Warn,
    Error,
}

pub(super) struct ChannelPrompter {
    tx: Sender<UiEvent>,
}

impl ChannelPrompter {
    pub(super) fn new(tx: Sender<UiEvent>) -> Self {
        Self { tx }
    }
}

impl Prompter for ChannelPrompter {
    fn input(&self, request: &InputRequest) -> Option<String> {
        let (reply, rx) = channel();
        let prompt = PromptRequest::Input {
            request: request.clone(),
            reply,
        };
        self.tx.send(UiEvent::Prompt(prompt)).ok()?;
        rx.recv().ok().flatten()
    }

    fn pick(&self, request: &PickRequest) -> Option<Vec<usize>> {
        let (reply, rx) = channel();
        let prompt = PromptRequest::Pick {
            request: request.clone(),
            reply,
        };
        self.tx.send(UiEvent::Prompt(prompt)).ok()?;
        rx.recv().ok().flatten()
    }

    fn confirm(&self, message: &str, accept: &str) -> bool {
        let (reply, rx) = channel();
        let prompt = PromptRequest::Confirm {
            message: message.to_string(),
            accept: accept.to_string(),
            reply,
        };
        if self.tx.send(UiEvent::Prompt(prompt)).is_err() {
            return false;
        }
        rx.recv().unwrap_or(false)
    }
}

/// Feedback for one edit; busy and restore apply to `target`.
pub(super) struct ChannelFeedback {
    tx: Sender<UiEvent>,
    target: Option<NodeKey>,
}

impl ChannelFeedback {
    pub(super) fn new(tx: Sender<UiEvent>, target: Option<NodeKey>) -> Self {
        Self { tx, target }
    }

    fn notice(&self, level: Level, message: &str) {
        let _ = self.tx.send(UiEvent::Notice {
            level,
            message: message.to_string(),
        });
    }
}

impl Feedback for ChannelFeedback {
    fn busy(&self, label: &str) {
        if let Some(key) = &self.target {
            let _ = self.tx.send(UiEvent::Busy {
                key: key.clone(),
                label: label.to_string(),
            });
        }
    }

    fn restore(&self) {
        if let Some(key) = &self.target {
            let _ = self.tx.send(UiEvent::Restore { key: key.clone() });
        }
    }

    fn copy(&self, text: &str) -> Result<()> {
        let (reply, rx) = channel();
        self.tx
            .send(UiEvent::Copy {
                text: text.to_string(),
                reply,
            })
            .map_err(|_| anyhow!("the terminal is closing"))?;
        rx.recv()
            .map_err(|_| anyhow!("the terminal is closing"))?
            .map_err(|msg| anyhow!(msg))
    }

    fn info(&self, message: &str) {
        self.notice(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notice(Level::Warn, message);
    }

    fn open_url(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "opening browser");
        portal::open(url)
    }
}
