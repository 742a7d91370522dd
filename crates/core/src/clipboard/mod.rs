mod system;

use futures::future::BoxFuture;

pub use system::SystemClipboard;

const LOG_TARGET: &str = "clipboard";

#[derive(thiserror::Error, Debug)]
pub enum ClipboardError {
    #[error("nothing to copy")]
    NothingToCopy,

    #[error("clipboard unavailable")]
    Unsupported,

    #[error("copy failed: {0}")]
    WriteFailed(String),
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: String) -> BoxFuture<'_, Result<(), ClipboardError>>;
}

/// Copies the trimmed `text`. Every platform failure surfaces as `WriteFailed`.
pub async fn copy<C: Clipboard + ?Sized>(clipboard: &C, text: &str) -> Result<(), ClipboardError> {
    let content = text.trim();
    if content.is_empty() {
        return Err(ClipboardError::NothingToCopy);
    }

    clipboard
        .write_text(content.to_owned())
        .await
        .map_err(|e| {
            tracing::warn!(target: LOG_TARGET, error = %e, "clipboard write rejected");
            match e {
                ClipboardError::WriteFailed(details) => ClipboardError::WriteFailed(details),
                other => ClipboardError::WriteFailed(other.to_string()),
            }
        })
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryClipboard;
    use super::*;

    #[tokio::test]
    async fn copies_trimmed_text() {
        let clipboard = MemoryClipboard::default();
        copy(&clipboard, "  Hello world \n").await.expect("copied");
        assert_eq!(clipboard.contents().as_deref(), Some("Hello world"));
    }

    #[tokio::test]
    async fn blank_text_is_not_written() {
        let clipboard = MemoryClipboard::default();
        let err = copy(&clipboard, " \t ").await.unwrap_err();
        assert!(matches!(err, ClipboardError::NothingToCopy));
        assert_eq!(clipboard.contents(), None);
    }

    #[tokio::test]
    async fn platform_failures_become_write_failed() {
        let clipboard = MemoryClipboard::rejecting();
        let err = copy(&clipboard, "Hello").await.unwrap_err();
        assert!(matches!(err, ClipboardError::WriteFailed(_)));
    }
}
