//! JSON file preferences backend
//!
//! Keeps every preference in one flat JSON object. The file is read once when the
//! store is opened and rewritten in full on every write.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use media_prefs_core::error::{PrefsError, PrefsResult};
use media_prefs_core::traits::PreferencesBackend;
use serde_json::{Map, Value};

use crate::config::StoreConfig;

const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

type Entries = Map<String, Value>;

/// Durable preferences backend backed by a JSON file.
///
/// Writes go through a sibling temp file followed by a rename, so a crash never
/// leaves a half-written store behind. A write that fails to reach the disk is
/// rolled back in memory as well.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl JsonFileStore {
    /// Open the store at `path`, a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> PrefsResult<Self> {
        let path = path.into();
        let entries = Self::load(&path)?;
        log::debug!(
            "Opened preferences store {} ({} keys)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn from_config(config: &StoreConfig) -> PrefsResult<Self> {
        Self::open(config.path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> PrefsResult<Entries> {
        if !path.exists() {
            log::debug!("Store file does not exist: {}", path.display());
            return Ok(Entries::new());
        }

        let size = fs::metadata(path)?.len();
        if size > MAX_STORE_FILE_SIZE {
            return Err(PrefsError::StoreTooLarge {
                size,
                max: MAX_STORE_FILE_SIZE,
            });
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(entries) => Ok(entries),
            other => Err(PrefsError::SerializationError(format!(
                "Invalid store format: expected object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    fn flush(&self, entries: &Entries) -> PrefsResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Apply `value` to `key` (removing it on `None`) and persist, undoing on failure.
    fn update(&self, key: &str, value: Option<Value>) -> PrefsResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let previous = match value {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };

        if let Err(e) = self.flush(&entries) {
            match previous {
                Some(old) => {
                    entries.insert(key.to_string(), old);
                }
                None => {
                    entries.remove(key);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(key: &str, expected: &str) -> PrefsError {
    PrefsError::TypeMismatch {
        key: key.to_string(),
        expected: expected.to_string(),
    }
}

impl PreferencesBackend for JsonFileStore {
    fn get_string(&self, key: &str) -> PrefsResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(_) => Err(mismatch(key, "string")),
        }
    }

    fn put_string(&self, key: &str, value: Option<&str>) -> PrefsResult<()> {
        self.update(key, value.map(|text| Value::String(text.to_string())))
    }

    fn get_bool(&self, key: &str) -> PrefsResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(flag)),
            Some(_) => Err(mismatch(key, "bool")),
        }
    }

    fn put_bool(&self, key: &str, value: bool) -> PrefsResult<()> {
        self.update(key, Some(Value::Bool(value)))
    }
}
