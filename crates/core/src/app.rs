//! Application state and the handlers behind every UI event.
//!
//! Handlers take `&mut self` and the front-end awaits each one before dispatching the
//! next event, so two translations never overlap and a late response cannot overwrite a
//! newer one.

use crate::catalog::{LanguageCode, LanguagePair};
use crate::clipboard::{self, Clipboard, ClipboardError};
use crate::messages::{Locale, Message};
use crate::prefs::{KeyValueStore, PreferenceStore, Theme};
use crate::speech::{self, SpeechEngine, SpeechError, Voice};
use crate::status::{counter_label, MessageKind, StatusBoard};
use crate::translate::{TranslateError, TranslationRequest, Translator};

const LOG_TARGET: &str = "app";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub source_text: String,
    pub translated_text: String,
    pub pair: LanguagePair,
    pub theme: Theme,
    pub voices: Vec<Voice>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    fn is_translate_shortcut(&self) -> bool {
        self.key == "Enter" && (self.ctrl || self.meta)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Translate,
    Swap,
    Clear,
    SpeakSource,
    SpeakTranslation,
    CopyTranslation,
    ToggleTheme,
    SelectSource(String),
    SelectTarget(String),
    SourceInput(String),
    KeyUp(KeyPress),
    VoicesChanged,
}

pub struct App<T, S, Sp, C> {
    state: AppState,
    translator: T,
    prefs: PreferenceStore<S>,
    speech: Option<Sp>,
    clipboard: Option<C>,
    status: StatusBoard,
    locale: Locale,
}

impl<T, S, Sp, C> App<T, S, Sp, C>
where
    T: Translator,
    S: KeyValueStore,
    Sp: SpeechEngine,
    C: Clipboard,
{
    /// Restores persisted preferences and makes a first attempt at listing voices.
    pub async fn load(
        translator: T,
        store: S,
        speech: Option<Sp>,
        clipboard: Option<C>,
        locale: Locale,
    ) -> Self {
        let prefs = PreferenceStore::new(store);
        let state = AppState {
            theme: prefs.load_theme(),
            pair: prefs.load_language_pair(),
            ..Default::default()
        };

        let mut app = Self {
            state,
            translator,
            prefs,
            speech,
            clipboard,
            status: StatusBoard::new(),
            locale,
        };
        app.refresh_voices().await;

        tracing::info!(
            target: LOG_TARGET,
            langpair = %app.state.pair.langpair(),
            theme = app.state.theme.as_str(),
            voices = app.state.voices.len(),
            "app loaded"
        );
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn prefs(&self) -> &PreferenceStore<S> {
        &self.prefs
    }

    pub fn counter(&self) -> String {
        counter_label(&self.state.source_text, self.locale)
    }

    pub async fn handle(&mut self, event: UiEvent) {
        tracing::debug!(target: LOG_TARGET, ?event, "ui event");
        match event {
            UiEvent::Translate => self.translate().await,
            UiEvent::Swap => self.swap(),
            UiEvent::Clear => self.clear(),
            UiEvent::SpeakSource => {
                let text = self.state.source_text.clone();
                let lang = self.state.pair.source.to_string();
                self.speak(&text, &lang).await;
            }
            UiEvent::SpeakTranslation => {
                let text = self.state.translated_text.clone();
                let lang = self.state.pair.target.to_string();
                self.speak(&text, &lang).await;
            }
            UiEvent::CopyTranslation => self.copy_translation().await,
            UiEvent::ToggleTheme => self.toggle_theme(),
            UiEvent::SelectSource(code) => self.select(code, true),
            UiEvent::SelectTarget(code) => self.select(code, false),
            UiEvent::SourceInput(text) => self.state.source_text = text,
            UiEvent::KeyUp(key) => {
                if key.is_translate_shortcut() {
                    self.translate().await;
                }
            }
            UiEvent::VoicesChanged => self.refresh_voices().await,
        }
    }

    fn notify(&self, message: Message, kind: MessageKind) {
        self.status.show_message(message.text(self.locale), kind);
    }

    async fn translate(&mut self) {
        let request =
            TranslationRequest::new(self.state.source_text.clone(), self.state.pair.clone());

        if let Err(e) = request.validate() {
            self.notify(validation_message(&e), MessageKind::Error);
            return;
        }

        self.notify(Message::Translating, MessageKind::Info);
        self.state.translated_text.clear();

        match self.translator.translate(request).await {
            Ok(result) => {
                self.state.translated_text = result.translated_text;
                self.notify(Message::TranslationReady, MessageKind::Ok);
            }
            Err(e @ (TranslateError::EmptyInput | TranslateError::IdenticalLanguages)) => {
                self.notify(validation_message(&e), MessageKind::Error);
            }
            Err(e) => {
                tracing::error!(target: LOG_TARGET, error = %e, kind = ?e.kind(), "translation failed");
                self.notify(Message::TranslationFailed, MessageKind::Error);
            }
        }
    }

    fn swap(&mut self) {
        self.state.pair = self.state.pair.swapped();
        std::mem::swap(&mut self.state.source_text, &mut self.state.translated_text);
        self.prefs.save_language_pair(&self.state.pair);
    }

    fn clear(&mut self) {
        self.state.source_text.clear();
        self.state.translated_text.clear();
        self.status.show_message("", MessageKind::Info);
    }

    fn select(&mut self, code: String, is_source: bool) {
        let code = match LanguageCode::new(code) {
            Ok(code) => code,
            Err(e) => {
                tracing::debug!(target: LOG_TARGET, error = %e, "rejected language selection");
                self.notify(Message::UnknownLanguage, MessageKind::Error);
                return;
            }
        };

        if is_source {
            self.state.pair.source = code;
        } else {
            self.state.pair.target = code;
        }
        self.prefs.save_language_pair(&self.state.pair);
    }

    fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
        self.prefs.save_theme(self.state.theme);
    }

    async fn refresh_voices(&mut self) {
        let Some(engine) = self.speech.as_ref() else {
            return;
        };
        match engine.voices().await {
            Ok(voices) => self.state.voices = voices,
            Err(e) => tracing::warn!(target: LOG_TARGET, error = %e, "voice enumeration failed"),
        }
    }

    async fn speak(&mut self, text: &str, lang: &str) {
        if text.trim().is_empty() {
            self.notify(Message::NothingToSpeak, MessageKind::Error);
            return;
        }
        if self.speech.is_none() {
            self.notify(Message::SpeechUnsupported, MessageKind::Error);
            return;
        }
        if self.state.voices.is_empty() {
            self.refresh_voices().await;
        }

        let Some(engine) = self.speech.as_ref() else {
            return;
        };
        match speech::speak(engine, &self.state.voices, text, lang) {
            Ok(()) => {}
            Err(SpeechError::NothingToSpeak) => {
                self.notify(Message::NothingToSpeak, MessageKind::Error)
            }
            Err(SpeechError::Unsupported) => {
                self.notify(Message::SpeechUnsupported, MessageKind::Error)
            }
            Err(e) => {
                tracing::error!(target: LOG_TARGET, error = %e, "speech failed");
                self.notify(Message::SpeechFailed, MessageKind::Error);
            }
        }
    }

    async fn copy_translation(&mut self) {
        let result = match self.clipboard.as_ref() {
            Some(cb) => clipboard::copy(cb, &self.state.translated_text).await,
            None if self.state.translated_text.trim().is_empty() => {
                Err(ClipboardError::NothingToCopy)
            }
            None => Err(ClipboardError::Unsupported),
        };

        match result {
            Ok(()) => self.notify(Message::Copied, MessageKind::Ok),
            Err(ClipboardError::NothingToCopy) => {
                self.notify(Message::NothingToCopy, MessageKind::Error)
            }
            Err(e) => {
                tracing::error!(target: LOG_TARGET, error = %e, "copy failed");
                self.notify(Message::CopyFailed, MessageKind::Error);
            }
        }
    }
}

fn validation_message(e: &TranslateError) -> Message {
    match e {
        TranslateError::IdenticalLanguages => Message::IdenticalLanguages,
        _ => Message::EmptyInput,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::MemoryClipboard;
    use crate::prefs::{MemoryStore, KEY_LAST_SOURCE_LANG, KEY_LAST_TARGET_LANG, KEY_THEME};
    use crate::speech::testing::RecordingEngine;
    use crate::translate::TranslationResult;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubTranslator {
        reply: Option<String>,
        calls: Mutex<Vec<TranslationRequest>>,
    }

    impl StubTranslator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_owned()),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self::default()
        }

        fn calls(&self) -> Vec<TranslationRequest> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl Translator for StubTranslator {
        fn translate(
            &self,
            request: TranslationRequest,
        ) -> BoxFuture<'_, Result<TranslationResult, TranslateError>> {
            async move {
                self.calls.lock().expect("lock").push(request);
                match &self.reply {
                    Some(text) => Ok(TranslationResult {
                        translated_text: text.clone(),
                    }),
                    None => Err(TranslateError::Http { status: 500 }),
                }
            }
            .boxed()
        }
    }

    type TestApp = App<StubTranslator, MemoryStore, RecordingEngine, MemoryClipboard>;

    async fn app_with(translator: StubTranslator, store: MemoryStore) -> TestApp {
        App::load(
            translator,
            store,
            Some(RecordingEngine::with_voices(&[("gb", "en-GB"), ("es", "es-ES")])),
            Some(MemoryClipboard::default()),
            Locale::En,
        )
        .await
    }

    fn status_text(app: &TestApp) -> Option<String> {
        app.status().current().map(|m| m.text)
    }

    #[tokio::test]
    async fn load_restores_preferences() {
        let store = MemoryStore::default()
            .with_value(KEY_THEME, "light")
            .with_value(KEY_LAST_SOURCE_LANG, "fr-FR")
            .with_value(KEY_LAST_TARGET_LANG, "de-DE");
        let app = app_with(StubTranslator::default(), store).await;
        assert_eq!(app.state().theme, Theme::Light);
        assert_eq!(app.state().pair.langpair(), "fr-FR|de-DE");
        assert_eq!(app.state().voices.len(), 2);
    }

    #[tokio::test]
    async fn translate_updates_field_and_status() {
        let translator = StubTranslator::replying("Hello world");
        let mut app = app_with(translator, MemoryStore::default()).await;
        app.handle(UiEvent::SourceInput("Hola mundo".into())).await;
        app.handle(UiEvent::Translate).await;

        assert_eq!(app.state().translated_text, "Hello world");
        assert_eq!(status_text(&app).as_deref(), Some("Translation ready"));
        let calls = app.translator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].pair.langpair(), "es-ES|en-GB");
    }

    #[tokio::test]
    async fn blank_input_never_reaches_translator() {
        let mut app = app_with(StubTranslator::replying("x"), MemoryStore::default()).await;
        app.handle(UiEvent::SourceInput("   ".into())).await;
        app.handle(UiEvent::Translate).await;

        assert!(app.translator.calls().is_empty());
        assert_eq!(
            status_text(&app).as_deref(),
            Some(Message::EmptyInput.text(Locale::En))
        );
    }

    #[tokio::test]
    async fn identical_languages_never_reach_translator() {
        let mut app = app_with(StubTranslator::replying("x"), MemoryStore::default()).await;
        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::SelectTarget("es-ES".into())).await;
        app.handle(UiEvent::Translate).await;

        assert!(app.translator.calls().is_empty());
        assert_eq!(
            status_text(&app).as_deref(),
            Some(Message::IdenticalLanguages.text(Locale::En))
        );
    }

    #[tokio::test]
    async fn failed_translation_leaves_field_empty() {
        let mut app = app_with(StubTranslator::failing(), MemoryStore::default()).await;
        app.state.translated_text = "stale".into();
        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::Translate).await;

        assert_eq!(app.state().translated_text, "");
        assert_eq!(
            status_text(&app).as_deref(),
            Some(Message::TranslationFailed.text(Locale::En))
        );
    }

    #[tokio::test]
    async fn ctrl_or_meta_enter_translates() {
        let mut app = app_with(StubTranslator::replying("Hi"), MemoryStore::default()).await;
        app.handle(UiEvent::SourceInput("Hola".into())).await;

        let plain = KeyPress {
            key: "Enter".into(),
            ctrl: false,
            meta: false,
        };
        app.handle(UiEvent::KeyUp(plain)).await;
        assert!(app.translator.calls().is_empty());

        let meta = KeyPress {
            key: "Enter".into(),
            ctrl: false,
            meta: true,
        };
        app.handle(UiEvent::KeyUp(meta)).await;
        let ctrl = KeyPress {
            key: "Enter".into(),
            ctrl: true,
            meta: false,
        };
        app.handle(UiEvent::KeyUp(ctrl)).await;
        assert_eq!(app.translator.calls().len(), 2);
    }

    #[tokio::test]
    async fn swap_exchanges_texts_and_persists_pair() {
        let mut app = app_with(StubTranslator::replying("Hello"), MemoryStore::default()).await;
        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::Translate).await;
        app.handle(UiEvent::Swap).await;

        assert_eq!(app.state().source_text, "Hello");
        assert_eq!(app.state().translated_text, "Hola");
        assert_eq!(app.state().pair.langpair(), "en-GB|es-ES");
        assert_eq!(app.counter(), "5 characters");

        let persisted = app.prefs().load_language_pair();
        assert_eq!(persisted, app.state().pair);
    }

    #[tokio::test]
    async fn clear_empties_fields_and_status() {
        let mut app = app_with(StubTranslator::replying("Hello"), MemoryStore::default()).await;
        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::Translate).await;
        app.handle(UiEvent::Clear).await;

        assert_eq!(app.state().source_text, "");
        assert_eq!(app.state().translated_text, "");
        assert_eq!(app.status().current(), None);
        assert_eq!(app.counter(), "0 characters");
    }

    #[tokio::test]
    async fn selections_are_validated_and_persisted() {
        let mut app = app_with(StubTranslator::default(), MemoryStore::default()).await;
        app.handle(UiEvent::SelectSource("it-IT".into())).await;
        app.handle(UiEvent::SelectTarget("xx-XX".into())).await;

        assert_eq!(app.state().pair.langpair(), "it-IT|en-GB");
        assert_eq!(
            app.prefs().inner().get(KEY_LAST_SOURCE_LANG).as_deref(),
            Some("it-IT")
        );
        assert_eq!(
            status_text(&app).as_deref(),
            Some(Message::UnknownLanguage.text(Locale::En))
        );
    }

    #[tokio::test]
    async fn toggle_theme_persists() {
        let mut app = app_with(StubTranslator::default(), MemoryStore::default()).await;
        assert_eq!(app.state().theme, Theme::Dark);
        app.handle(UiEvent::ToggleTheme).await;
        assert_eq!(app.state().theme, Theme::Light);
        assert_eq!(app.prefs().load_theme(), Theme::Light);
    }

    #[tokio::test]
    async fn speaking_twice_keeps_only_latest_utterance() {
        let mut app = app_with(StubTranslator::replying("Hello"), MemoryStore::default()).await;
        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::Translate).await;
        app.handle(UiEvent::SpeakSource).await;
        app.handle(UiEvent::SpeakTranslation).await;

        let engine = app.speech.as_ref().expect("engine");
        let active = engine.active().expect("active");
        assert_eq!(active.text, "Hello");
        assert_eq!(active.lang, "en-GB");
        assert_eq!(active.voice.map(|v| v.name).as_deref(), Some("gb"));
    }

    #[tokio::test]
    async fn voices_are_refetched_when_cache_is_empty() {
        let mut app = app_with(StubTranslator::default(), MemoryStore::default()).await;
        app.state.voices.clear();
        app.handle(UiEvent::VoicesChanged).await;
        assert_eq!(app.state().voices.len(), 2);

        app.state.voices.clear();
        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::SpeakSource).await;
        assert_eq!(app.state().voices.len(), 2);
        let engine = app.speech.as_ref().expect("engine");
        let active = engine.active().expect("active");
        assert_eq!(active.voice.map(|v| v.name).as_deref(), Some("es"));
    }

    #[tokio::test]
    async fn copy_without_clipboard_reports_failure() {
        let mut app: TestApp = App::load(
            StubTranslator::replying("Hello"),
            MemoryStore::default(),
            None,
            None,
            Locale::En,
        )
        .await;
        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::Translate).await;
        app.handle(UiEvent::CopyTranslation).await;
        assert_eq!(
            status_text(&app).as_deref(),
            Some(Message::CopyFailed.text(Locale::En))
        );
    }

    #[tokio::test]
    async fn speech_without_engine_is_unsupported() {
        let mut app: TestApp = App::load(
            StubTranslator::default(),
            MemoryStore::default(),
            None,
            None,
            Locale::Es,
        )
        .await;
        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::SpeakSource).await;
        assert_eq!(
            status_text(&app).as_deref(),
            Some(Message::SpeechUnsupported.text(Locale::Es))
        );
    }

    #[tokio::test]
    async fn copy_translation_reports_outcome() {
        let mut app = app_with(StubTranslator::replying(" Hello "), MemoryStore::default()).await;
        app.handle(UiEvent::CopyTranslation).await;
        assert_eq!(
            status_text(&app).as_deref(),
            Some(Message::NothingToCopy.text(Locale::En))
        );

        app.handle(UiEvent::SourceInput("Hola".into())).await;
        app.handle(UiEvent::Translate).await;
        app.handle(UiEvent::CopyTranslation).await;
        assert_eq!(status_text(&app).as_deref(), Some("Translation copied to the clipboard"));
        let clipboard = app.clipboard.as_ref().expect("clipboard");
        assert_eq!(clipboard.contents().as_deref(), Some("Hello"));
    }
}
