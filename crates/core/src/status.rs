use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Ok,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
}

/// The transient status line.
///
/// Each non-empty message schedules its own clear. A clear blanks whatever is showing
/// when it fires, so an older timer can cut a newer message short.
#[derive(Clone)]
pub struct StatusBoard {
    tx: Arc<watch::Sender<Option<StatusMessage>>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Must be called from within a tokio runtime when `text` is non-empty.
    pub fn show_message(&self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        if text.is_empty() {
            self.tx.send_replace(None);
            return;
        }

        self.tx.send_replace(Some(StatusMessage { text, kind }));

        let tx = Arc::clone(&self.tx);
        tokio::spawn(async move {
            tokio::time::sleep(STATUS_CLEAR_DELAY).await;
            tx.send_replace(None);
        });
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.tx.subscribe()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Character counter text for the source field, e.g. `"12 characters"`.
pub fn counter_label(text: &str, locale: Locale) -> String {
    let count = text.chars().count();
    let unit = match (locale, count == 1) {
        (Locale::En, true) => "character",
        (Locale::En, false) => "characters",
        (Locale::Es, true) => "caracter",
        (Locale::Es, false) => "caracteres",
    };
    format!("{count} {unit}")
}
