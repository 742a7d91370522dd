use crate::clipboard::{Clipboard, ClipboardError};
use cli_clipboard::{ClipboardContext, ClipboardProvider};
use futures::future::BoxFuture;
use futures::FutureExt;

/// The desktop clipboard. Access is blocking, so each write runs on the blocking pool.
#[derive(Clone, Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: String) -> BoxFuture<'_, Result<(), ClipboardError>> {
        async move {
            tokio::task::spawn_blocking(move || {
                let mut ctx = ClipboardContext::new()
                    .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
                ctx.set_contents(text)
                    .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
            })
            .await
            .map_err(|e| ClipboardError::WriteFailed(format!("clipboard task failed: {e}")))?
        }
        .boxed()
    }
}
