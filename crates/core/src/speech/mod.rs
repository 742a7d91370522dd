mod espeak;

use crate::catalog::primary_subtag;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use espeak::{parse_voice_list, EspeakSpeechEngine, DEFAULT_ESPEAK_BIN};

pub const NEUTRAL_RATE: f32 = 1.0;
pub const NEUTRAL_PITCH: f32 = 1.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub voice: Option<Voice>,
}

#[derive(thiserror::Error, Debug)]
pub enum SpeechError {
    #[error("nothing to speak")]
    NothingToSpeak,

    #[error("speech output unsupported")]
    Unsupported,

    #[error("speech engine error: {0}")]
    Engine(String),
}

/// A platform voice synthesizer. `speak` starts output and returns without waiting
/// for it to finish.
pub trait SpeechEngine: Send + Sync {
    fn voices(&self) -> BoxFuture<'_, Result<Vec<Voice>, SpeechError>>;
    fn cancel(&self);
    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError>;
}

/// Exact tag, then same primary subtag, then whatever voice comes first.
pub fn best_voice<'a>(voices: &'a [Voice], lang: &str) -> Option<&'a Voice> {
    voices
        .iter()
        .find(|v| v.lang.eq_ignore_ascii_case(lang))
        .or_else(|| {
            let prefix = primary_subtag(lang);
            voices
                .iter()
                .find(|v| primary_subtag(&v.lang).eq_ignore_ascii_case(prefix))
        })
        .or_else(|| voices.first())
}

/// Reads `text` aloud in `lang`, replacing anything currently being spoken.
pub fn speak<E: SpeechEngine + ?Sized>(
    engine: &E,
    voices: &[Voice],
    text: &str,
    lang: &str,
) -> Result<(), SpeechError> {
    let content = text.trim();
    if content.is_empty() {
        return Err(SpeechError::NothingToSpeak);
    }

    engine.cancel();

    let utterance = Utterance {
        text: content.to_owned(),
        lang: lang.to_owned(),
        rate: NEUTRAL_RATE,
        pitch: NEUTRAL_PITCH,
        voice: best_voice(voices, lang).cloned(),
    };
    engine.speak(utterance)
}
