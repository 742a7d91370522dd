use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            _ => Err(UnknownLocale(s.to_owned())),
        }
    }
}

/// Every status text the user can see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    EmptyInput,
    IdenticalLanguages,
    Translating,
    TranslationReady,
    TranslationFailed,
    NothingToSpeak,
    SpeechUnsupported,
    SpeechFailed,
    NothingToCopy,
    Copied,
    CopyFailed,
    UnknownLanguage,
}

impl Message {
    pub fn text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                Message::EmptyInput => "Type some text to translate.",
                Message::IdenticalLanguages => "Source and target languages must differ.",
                Message::Translating => "Translating...",
                Message::TranslationReady => "Translation ready",
                Message::TranslationFailed => "Something went wrong while translating. Try again.",
                Message::NothingToSpeak => "There is no text to read aloud.",
                Message::SpeechUnsupported => "Speech output is not supported here.",
                Message::SpeechFailed => "Could not start speech output.",
                Message::NothingToCopy => "There is no translation to copy.",
                Message::Copied => "Translation copied to the clipboard",
                Message::CopyFailed => "Could not copy to the clipboard.",
                Message::UnknownLanguage => "That language is not supported.",
            },
            Locale::Es => match self {
                Message::EmptyInput => "Escribe algún texto para traducir.",
                Message::IdenticalLanguages => {
                    "Los idiomas de origen y destino no pueden ser iguales."
                }
                Message::Translating => "Traduciendo...",
                Message::TranslationReady => "Traducción lista",
                Message::TranslationFailed => "Ocurrió un error al traducir. Intenta nuevamente.",
                Message::NothingToSpeak => "No hay texto para pronunciar.",
                Message::SpeechUnsupported => "No hay soporte para pronunciación por voz.",
                Message::SpeechFailed => "No se pudo iniciar la pronunciación.",
                Message::NothingToCopy => "No hay traducción para copiar.",
                Message::Copied => "Traducción copiada al portapapeles",
                Message::CopyFailed => "No se pudo copiar al portapapeles.",
                Message::UnknownLanguage => "Ese idioma no está disponible.",
            },
        }
    }
}
