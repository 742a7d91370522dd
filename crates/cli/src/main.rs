#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use quick_translate_core::app::{App, UiEvent};
use quick_translate_core::catalog::{self, all_languages};
use quick_translate_core::clipboard::SystemClipboard;
use quick_translate_core::config::{
    resolve_endpoint, resolve_locale, resolve_store, AppConfig, Env, SpeechConfig, StdEnv,
    StoreLocation, ENV_ESPEAK_BIN,
};
use quick_translate_core::messages::Locale;
use quick_translate_core::prefs::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
use quick_translate_core::speech::{EspeakSpeechEngine, DEFAULT_ESPEAK_BIN};
use quick_translate_core::status::{MessageKind, StatusMessage};
use quick_translate_core::translate::MyMemoryTranslator;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

type TerminalApp = App<MyMemoryTranslator, PreferenceBackend, EspeakSpeechEngine, SystemClipboard>;

#[derive(Parser, Debug)]
#[command(name = "quick-translate")]
#[command(about = "Translate text between languages from the terminal")]
struct Args {
    /// Translation API endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Preference file location
    #[arg(long)]
    store: Option<PathBuf>,

    /// Keep preferences in memory only
    #[arg(long, default_value_t = false)]
    ephemeral: bool,

    /// Interface language (en, es)
    #[arg(long)]
    locale: Option<String>,

    #[arg(long, env = ENV_ESPEAK_BIN, default_value = DEFAULT_ESPEAK_BIN)]
    espeak_bin: PathBuf,

    #[arg(long, default_value_t = false)]
    no_speech: bool,

    /// Source language code, persisted like a selection
    #[arg(long)]
    from: Option<String>,

    /// Target language code, persisted like a selection
    #[arg(long)]
    to: Option<String>,

    /// Translate this text, print the result and exit
    #[arg(long)]
    text: Option<String>,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

enum PreferenceBackend {
    File(JsonFileStore),
    Memory(MemoryStore),
}

impl KeyValueStore for PreferenceBackend {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            PreferenceBackend::File(s) => s.get(key),
            PreferenceBackend::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            PreferenceBackend::File(s) => s.set(key, value),
            PreferenceBackend::Memory(s) => s.set(key, value),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Event(UiEvent),
    Languages,
    Show,
    Help,
    Quit,
    Unknown(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let one_shot = args.text.clone();
    let selection = (args.from.clone(), args.to.clone());
    let cfg = build_config(args, &StdEnv)?;

    tracing::info!(
        endpoint = %cfg.endpoint,
        locale = cfg.locale.as_str(),
        speech = cfg.speech.enabled,
        "config loaded"
    );

    let mut app = build_app(cfg).await;

    if let Some(code) = selection.0 {
        app.handle(UiEvent::SelectSource(code)).await;
    }
    if let Some(code) = selection.1 {
        app.handle(UiEvent::SelectTarget(code)).await;
    }

    match one_shot {
        Some(text) => translate_once(&mut app, text).await,
        None => run_interactive(&mut app).await,
    }
}

async fn build_app(cfg: AppConfig) -> TerminalApp {
    let translator = MyMemoryTranslator::with_endpoint(cfg.endpoint);

    let store = match cfg.store {
        StoreLocation::File(path) => PreferenceBackend::File(JsonFileStore::open(path)),
        StoreLocation::Ephemeral => PreferenceBackend::Memory(MemoryStore::default()),
    };

    let speech = if cfg.speech.enabled {
        let engine = EspeakSpeechEngine::new(cfg.speech.espeak_bin.clone());
        if engine.is_available().await {
            Some(engine)
        } else {
            tracing::warn!(binary = %cfg.speech.espeak_bin.display(), "speech engine unavailable, speech disabled");
            None
        }
    } else {
        None
    };

    App::load(translator, store, speech, Some(SystemClipboard::new()), cfg.locale).await
}

async fn translate_once(app: &mut TerminalApp, text: String) -> anyhow::Result<()> {
    if let Some(message) = app.status().current() {
        if message.kind == MessageKind::Error {
            anyhow::bail!(message.text);
        }
    }

    app.handle(UiEvent::SourceInput(text)).await;
    app.handle(UiEvent::Translate).await;

    match app.status().current() {
        Some(message) if message.kind == MessageKind::Error => anyhow::bail!(message.text),
        _ => {
            println!("{}", app.state().translated_text);
            Ok(())
        }
    }
}

async fn run_interactive(app: &mut TerminalApp) -> anyhow::Result<()> {
    let mut status_rx = app.status().subscribe();
    let render = tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let current = status_rx.borrow_and_update().clone();
            if let Some(message) = current {
                render_status(&message);
            }
        }
    });

    print_help();
    print_summary(app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_input(&line) {
            Input::Event(event) => {
                let kind = EchoKind::after(&event);
                app.handle(event).await;
                let echo = match kind {
                    Some(EchoKind::Counter) => Some(format!("({})", app.counter())),
                    Some(EchoKind::Translation) => translation_echo(&app.state().translated_text),
                    None => None,
                };
                if let Some(line) = echo {
                    println!("{line}");
                }
            }
            Input::Languages => print_languages(app.locale()),
            Input::Show => print_summary(app),
            Input::Help => print_help(),
            Input::Quit => break,
            Input::Unknown(cmd) => eprintln!("unknown command: {cmd} (try /help)"),
        }
    }

    render.abort();
    Ok(())
}

/// What gets printed after an event has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EchoKind {
    Counter,
    Translation,
}

impl EchoKind {
    fn after(event: &UiEvent) -> Option<Self> {
        match event {
            UiEvent::SourceInput(_) => Some(Self::Counter),
            UiEvent::Translate | UiEvent::Swap => Some(Self::Translation),
            _ => None,
        }
    }
}

fn translation_echo(translated: &str) -> Option<String> {
    (!translated.is_empty()).then(|| format!("=> {translated}"))
}

fn parse_input(line: &str) -> Input {
    let Some(command) = line.strip_prefix('/') else {
        return Input::Event(UiEvent::SourceInput(line.to_owned()));
    };

    let mut parts = command.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default().to_owned();

    match name {
        "t" | "translate" => Input::Event(UiEvent::Translate),
        "swap" => Input::Event(UiEvent::Swap),
        "clear" => Input::Event(UiEvent::Clear),
        "say" => Input::Event(UiEvent::SpeakSource),
        "say-t" => Input::Event(UiEvent::SpeakTranslation),
        "copy" => Input::Event(UiEvent::CopyTranslation),
        "theme" => Input::Event(UiEvent::ToggleTheme),
        "from" => Input::Event(UiEvent::SelectSource(arg)),
        "to" => Input::Event(UiEvent::SelectTarget(arg)),
        "voices" => Input::Event(UiEvent::VoicesChanged),
        "langs" => Input::Languages,
        "show" => Input::Show,
        "help" => Input::Help,
        "quit" | "q" => Input::Quit,
        other => Input::Unknown(other.to_owned()),
    }
}

fn render_status(message: &StatusMessage) {
    let tag = match message.kind {
        MessageKind::Info => "..",
        MessageKind::Ok => "ok",
        MessageKind::Error => "!!",
    };
    println!("[{tag}] {}", message.text);
}

fn print_languages(locale: Locale) {
    for lang in all_languages() {
        println!("  {:<6} {}", lang.code, lang.display_name(locale));
    }
}

fn print_summary(app: &TerminalApp) {
    let locale = app.locale();
    let state = app.state();
    let name = |code: &str| {
        catalog::find(code)
            .map(|l| l.display_name(locale))
            .unwrap_or_default()
    };
    println!(
        "{} -> {}   [{}] theme: {}",
        name(state.pair.source.as_str()),
        name(state.pair.target.as_str()),
        app.counter(),
        state.theme.label(locale)
    );
    if !state.source_text.is_empty() {
        println!("source:      {}", state.source_text);
    }
    if !state.translated_text.is_empty() {
        println!("translation: {}", state.translated_text);
    }
}

fn print_help() {
    println!("Type text to set the source, then /t to translate.");
    println!("Commands: /t /swap /clear /say /say-t /copy /theme /from <code> /to <code>");
    println!("          /langs /show /voices /help /quit");
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    let endpoint = resolve_endpoint(args.endpoint, env)?;
    let locale = resolve_locale(args.locale, env)?;
    let store = resolve_store(args.store, args.ephemeral, env)?;

    Ok(AppConfig {
        endpoint,
        store,
        locale,
        speech: SpeechConfig {
            enabled: !args.no_speech,
            espeak_bin: args.espeak_bin,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_translate_core::config::{MapEnv, ENV_LOCALE};

    #[test]
    fn plain_lines_set_source_text() {
        assert_eq!(
            parse_input("Hola mundo"),
            Input::Event(UiEvent::SourceInput("Hola mundo".into()))
        );
    }

    #[test]
    fn source_input_echoes_counter() {
        assert_eq!(
            EchoKind::after(&UiEvent::SourceInput("Hola".into())),
            Some(EchoKind::Counter)
        );
        assert_eq!(EchoKind::after(&UiEvent::Swap), Some(EchoKind::Translation));
        assert_eq!(EchoKind::after(&UiEvent::Clear), None);
        assert_eq!(translation_echo(""), None);
        assert_eq!(translation_echo("Hello").as_deref(), Some("=> Hello"));
    }

    #[test]
    fn commands_map_to_events() {
        assert_eq!(parse_input("/t"), Input::Event(UiEvent::Translate));
        assert_eq!(parse_input("/say-t"), Input::Event(UiEvent::SpeakTranslation));
        assert_eq!(
            parse_input("/from  fr-FR "),
            Input::Event(UiEvent::SelectSource("fr-FR".into()))
        );
        assert_eq!(parse_input("/q"), Input::Quit);
        assert_eq!(parse_input("/nope"), Input::Unknown("nope".into()));
    }

    #[test]
    fn build_config_reads_env_fallbacks() {
        let args = Args::parse_from(["quick-translate", "--ephemeral", "--no-speech"]);
        let env = MapEnv::default().with_var(ENV_LOCALE, "es");
        let cfg = build_config(args, &env).expect("config");
        assert_eq!(cfg.locale, Locale::Es);
        assert_eq!(cfg.store, StoreLocation::Ephemeral);
        assert!(!cfg.speech.enabled);
    }
}
