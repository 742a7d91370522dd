mod mymemory;

use crate::catalog::LanguagePair;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use mymemory::{extract_translation, MyMemoryTranslator, DEFAULT_ENDPOINT};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub pair: LanguagePair,
}

impl TranslationRequest {
    pub fn new<S: Into<String>>(text: S, pair: LanguagePair) -> Self {
        Self {
            text: text.into(),
            pair,
        }
    }

    /// Checks the request before any network activity and returns the trimmed text.
    pub fn validate(&self) -> Result<&str, TranslateError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(TranslateError::EmptyInput);
        }
        if self.pair.is_identical() {
            return Err(TranslateError::IdenticalLanguages);
        }
        Ok(text)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationResult {
    pub translated_text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Parse,
}

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("empty input")]
    EmptyInput,

    #[error("identical languages")]
    IdenticalLanguages,

    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("http error {status}")]
    Http { status: u16 },

    #[error("malformed response: {0}")]
    InvalidResponse(String),
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::EmptyInput | TranslateError::IdenticalLanguages => {
                ErrorKind::Validation
            }
            TranslateError::InvalidEndpoint(_)
            | TranslateError::Network(_)
            | TranslateError::Http { .. } => ErrorKind::Transport,
            TranslateError::InvalidResponse(_) => ErrorKind::Parse,
        }
    }
}

pub trait Translator: Send + Sync {
    fn translate(
        &self,
        request: TranslationRequest,
    ) -> BoxFuture<'_, Result<TranslationResult, TranslateError>>;
}
