use crate::speech::{SpeechEngine, SpeechError, Utterance, Voice};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};
use tokio::process::{Child, Command};

pub const DEFAULT_ESPEAK_BIN: &str = "espeak-ng";
const ESPEAK_BASE_WPM: f32 = 175.0;
const ESPEAK_BASE_PITCH: f32 = 50.0;
const LOG_TARGET: &str = "speech::espeak";

/// Speech through an `espeak-ng` child process. Only the most recent child is kept.
pub struct EspeakSpeechEngine {
    binary: PathBuf,
    current: Mutex<Option<Child>>,
}

impl EspeakSpeechEngine {
    #[must_use]
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            current: Mutex::new(None),
        }
    }

    /// Whether the binary can be spawned at all.
    pub async fn is_available(&self) -> bool {
        match Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => status.success(),
            Err(e) => {
                tracing::debug!(target: LOG_TARGET, binary = %self.binary.display(), error = %e, "espeak not available");
                false
            }
        }
    }

    fn command_for(&self, utterance: &Utterance) -> Command {
        // espeak selects voices by language tag, so the matched voice's tag is used.
        let voice = utterance
            .voice
            .as_ref()
            .map(|v| v.lang.clone())
            .unwrap_or_else(|| utterance.lang.to_ascii_lowercase());
        let wpm = (ESPEAK_BASE_WPM * utterance.rate).round() as u32;
        let pitch = (ESPEAK_BASE_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32;

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-v")
            .arg(voice)
            .arg("-s")
            .arg(wpm.to_string())
            .arg("-p")
            .arg(pitch.to_string())
            .arg("--")
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for EspeakSpeechEngine {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_ESPEAK_BIN))
    }
}

/// Parses `espeak-ng --voices` output.
///
/// Columns are `Pty Language Age/Gender VoiceName File [Other Languages]`; the header
/// row and short lines are skipped.
pub fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            match cols.as_slice() {
                [_pty, lang, _age_gender, name, ..] => Some(Voice {
                    name: (*name).to_owned(),
                    lang: (*lang).to_owned(),
                }),
                _ => None,
            }
        })
        .collect()
}

impl SpeechEngine for EspeakSpeechEngine {
    fn voices(&self) -> BoxFuture<'_, Result<Vec<Voice>, SpeechError>> {
        async move {
            let output = Command::new(&self.binary)
                .arg("--voices")
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| {
                    let path = self.binary.display();
                    SpeechError::Engine(format!("failed to spawn {path}: {e}"))
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(SpeechError::Engine(format!(
                    "voice listing exited with {}: {stderr}",
                    output.status
                )));
            }

            let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
            tracing::debug!(target: LOG_TARGET, count = voices.len(), "voices enumerated");
            Ok(voices)
        }
        .boxed()
    }

    fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut child) = current.take() {
            if let Err(e) = child.start_kill() {
                tracing::debug!(target: LOG_TARGET, error = %e, "utterance already finished");
            }
        }
    }

    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        let child = self.command_for(&utterance).spawn().map_err(|e| {
            let path = self.binary.display();
            SpeechError::Engine(format!("failed to spawn {path}: {e}"))
        })?;

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut previous) = current.replace(child) {
            if let Err(e) = previous.start_kill() {
                tracing::debug!(target: LOG_TARGET, error = %e, "utterance already finished");
            }
        }
        Ok(())
    }
}
