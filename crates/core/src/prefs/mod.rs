mod file;
mod memory;

use crate::catalog::{self, LanguageCode, LanguagePair, DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG};
use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub const KEY_THEME: &str = "theme";
pub const KEY_LAST_SOURCE_LANG: &str = "last_source_lang";
pub const KEY_LAST_TARGET_LANG: &str = "last_target_lang";

const LOG_TARGET: &str = "prefs";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("preference file io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Flat string-to-string persistence, the shape of browser local storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Theme::Light, Locale::En) => "Light",
            (Theme::Dark, Locale::En) => "Dark",
            (Theme::Light, Locale::Es) => "Claro",
            (Theme::Dark, Locale::Es) => "Oscuro",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(s.to_owned())),
        }
    }
}

/// Typed view over the three persisted preference keys.
///
/// Reads never fail: absent and malformed values both resolve to defaults. Writes are
/// best-effort and only logged when they fail.
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn load_theme(&self) -> Theme {
        self.store
            .get(KEY_THEME)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn save_theme(&mut self, theme: Theme) {
        self.write(KEY_THEME, theme.as_str());
    }

    /// Restores the last pair, falling back per side to es-ES / en-GB.
    ///
    /// A stored pair with both sides equal keeps its source and moves the target to
    /// en-GB, or to es-ES when the source is itself en-GB.
    pub fn load_language_pair(&self) -> LanguagePair {
        let source = self.stored_code(KEY_LAST_SOURCE_LANG, DEFAULT_SOURCE_LANG);
        let mut target = self.stored_code(KEY_LAST_TARGET_LANG, DEFAULT_TARGET_LANG);

        if source == target {
            target = if source.as_str() == DEFAULT_TARGET_LANG {
                LanguageCode::default_source()
            } else {
                LanguageCode::default_target()
            };
        }

        LanguagePair::new(source, target)
    }

    pub fn save_language_pair(&mut self, pair: &LanguagePair) {
        self.write(KEY_LAST_SOURCE_LANG, pair.source.as_str());
        self.write(KEY_LAST_TARGET_LANG, pair.target.as_str());
    }

    fn stored_code(&self, key: &str, default: &str) -> LanguageCode {
        let stored = self.store.get(key).filter(|c| catalog::is_valid(c));
        let code = stored.as_deref().unwrap_or(default);
        LanguageCode::new(code).unwrap_or_else(|_| {
            tracing::warn!(target: LOG_TARGET, key, code, "default language missing from catalog");
            LanguageCode::default_source()
        })
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(target: LOG_TARGET, key, error = %e, "failed to persist preference");
        }
    }
}
