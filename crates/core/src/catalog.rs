//! The fixed set of languages offered for translation.
//!
//! Table order is the order the selectors present options in.

use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SOURCE_LANG: &str = "es-ES";
pub const DEFAULT_TARGET_LANG: &str = "en-GB";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub english_name: &'static str,
    pub spanish_name: &'static str,
}

impl Language {
    pub fn display_name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.english_name,
            Locale::Es => self.spanish_name,
        }
    }
}

const fn lang(
    code: &'static str,
    english_name: &'static str,
    spanish_name: &'static str,
) -> Language {
    Language {
        code,
        english_name,
        spanish_name,
    }
}

pub static LANGUAGES: &[Language] = &[
    lang("es-ES", "Spanish (Spain)", "Español (España)"),
    lang("es-MX", "Spanish (Mexico)", "Español (México)"),
    lang("en-GB", "English (UK)", "Inglés (UK)"),
    lang("en-US", "English (US)", "Inglés (US)"),
    lang("fr-FR", "French", "Francés"),
    lang("pt-BR", "Portuguese (Brazil)", "Portugués (Brasil)"),
    lang("it-IT", "Italian", "Italiano"),
    lang("de-DE", "German", "Alemán"),
    lang("ru-RU", "Russian", "Ruso"),
    lang("ja-JP", "Japanese", "Japonés"),
    lang("zh-CN", "Chinese (Simplified)", "Chino (Simplificado)"),
    lang("ko-KR", "Korean", "Coreano"),
    lang("ar-SA", "Arabic", "Árabe"),
    lang("hi-IN", "Hindi", "Hindi"),
    lang("nl-NL", "Dutch", "Neerlandés"),
    lang("sv-SE", "Swedish", "Sueco"),
    lang("no-NO", "Norwegian", "Noruego"),
    lang("pl-PL", "Polish", "Polaco"),
    lang("tr-TR", "Turkish", "Turco"),
];

pub fn all_languages() -> &'static [Language] {
    LANGUAGES
}

pub fn is_valid(code: &str) -> bool {
    find(code).is_some()
}

pub fn find(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("language code not in catalog: {0}")]
    UnknownLanguage(String),
}

/// A code that is known to exist in [`LANGUAGES`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, CatalogError> {
        let v = value.into();
        if !is_valid(&v) {
            return Err(CatalogError::UnknownLanguage(v));
        }
        Ok(Self(v))
    }

    pub fn default_source() -> Self {
        Self(DEFAULT_SOURCE_LANG.to_owned())
    }

    pub fn default_target() -> Self {
        Self(DEFAULT_TARGET_LANG.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `"en"` for `"en-GB"`.
    pub fn primary_subtag(&self) -> &str {
        primary_subtag(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: LanguageCode,
    pub target: LanguageCode,
}

impl LanguagePair {
    pub fn new(source: LanguageCode, target: LanguageCode) -> Self {
        Self { source, target }
    }

    pub fn swapped(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }

    pub fn is_identical(&self) -> bool {
        self.source == self.target
    }

    /// Wire form used by the translation API, e.g. `es-ES|en-GB`.
    pub fn langpair(&self) -> String {
        format!("{}|{}", self.source, self.target)
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            source: LanguageCode::default_source(),
            target: LanguageCode::default_target(),
        }
    }
}
