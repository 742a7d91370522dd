use crate::prefs::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "prefs::file";

/// Preferences kept as one flat JSON object on disk.
///
/// The whole file is read once on open and rewritten on every `set`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing or unreadable file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path);
        Self { path, values }
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }
}

fn read_values(path: &Path) -> BTreeMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(target: LOG_TARGET, path = %path.display(), error = %e, "cannot read preferences");
            return BTreeMap::new();
        }
    };

    let parsed: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(target: LOG_TARGET, path = %path.display(), error = %e, "ignoring corrupt preferences");
            return BTreeMap::new();
        }
    };

    parsed
        .into_iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect()
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().expect("tempdir");
        let store = JsonFileStore::open(dir.path().join("prefs.json"));
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = JsonFileStore::open(&path);
        store.set("theme", "light").expect("write");
        store.set("last_source_lang", "fr-FR").expect("write");

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("theme").as_deref(), Some("light"));
        assert_eq!(reopened.get("last_source_lang").as_deref(), Some("fr-FR"));
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn non_string_values_are_ignored() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"theme": 1, "last_target_lang": "it-IT"}"#).expect("write");

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("theme"), None);
        assert_eq!(store.get("last_target_lang").as_deref(), Some("it-IT"));
    }
}
