use crate::messages::Locale;
use crate::translate::DEFAULT_ENDPOINT;
use directories::ProjectDirs;
use std::path::PathBuf;
use url::Url;

pub const ENV_ENDPOINT: &str = "QUICK_TRANSLATE_ENDPOINT";
pub const ENV_STORE_PATH: &str = "QUICK_TRANSLATE_STORE";
pub const ENV_LOCALE: &str = "QUICK_TRANSLATE_LOCALE";
pub const ENV_ESPEAK_BIN: &str = "QUICK_TRANSLATE_ESPEAK";
pub const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Ephemeral,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub espeak_bin: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: Url,
    pub store: StoreLocation,
    pub locale: Locale,
    pub speech: SpeechConfig,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid translation endpoint {value}: {source}")]
    InvalidEndpoint {
        value: String,
        source: url::ParseError,
    },
    #[error("unknown locale: {0}")]
    UnknownLocale(String),
    #[error("could not determine a configuration directory")]
    NoConfigDir,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_optional_string(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Option<String> {
    match cli_value {
        Some(v) => Some(v),
        None => env.var(env_key),
    }
}

pub fn resolve_endpoint(
    cli_value: Option<String>,
    env: &impl Env,
) -> Result<Url, ConfigError> {
    let value = resolve_string_with_default(cli_value, ENV_ENDPOINT, env, DEFAULT_ENDPOINT);
    Url::parse(&value).map_err(|source| ConfigError::InvalidEndpoint { value, source })
}

pub fn resolve_locale(cli_value: Option<String>, env: &impl Env) -> Result<Locale, ConfigError> {
    match resolve_optional_string(cli_value, ENV_LOCALE, env) {
        Some(v) => v.parse().map_err(|_| ConfigError::UnknownLocale(v)),
        None => Ok(Locale::default()),
    }
}

/// `--ephemeral` wins, then an explicit path, then the per-user config directory.
pub fn resolve_store(
    cli_value: Option<PathBuf>,
    ephemeral: bool,
    env: &impl Env,
) -> Result<StoreLocation, ConfigError> {
    if ephemeral {
        return Ok(StoreLocation::Ephemeral);
    }
    if let Some(path) = cli_value {
        return Ok(StoreLocation::File(path));
    }
    if let Some(path) = env.var(ENV_STORE_PATH) {
        return Ok(StoreLocation::File(PathBuf::from(path)));
    }
    default_store_path().map(StoreLocation::File)
}

pub fn default_store_path() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("net", "quick-translate", "quick-translate")
        .map(|dirs| dirs.config_dir().join(PREFERENCES_FILE))
        .ok_or(ConfigError::NoConfigDir)
}
