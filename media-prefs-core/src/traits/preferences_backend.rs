//! Key/value persistence abstract Trait

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{PrefsError, PrefsResult};

/// Key/value persistence backend Trait
///
/// Values are either strings or booleans. Defaults for missing keys are
/// applied by the caller, the backend only reports presence.
///
/// Platform implementation:
/// - Desktop / CLI: `JsonFileStore` (media-prefs-app)
/// - Tests and ephemeral hosts: `InMemoryPreferencesBackend`
pub trait PreferencesBackend: Send + Sync {
    /// Read a string value
    ///
    /// # Returns
    /// * `Ok(Some(value))` - key exists
    /// * `Ok(None)` - key does not exist
    fn get_string(&self, key: &str) -> PrefsResult<Option<String>>;

    /// Write a string value, `None` removes the key
    fn put_string(&self, key: &str, value: Option<&str>) -> PrefsResult<()>;

    /// Read a boolean value
    fn get_bool(&self, key: &str) -> PrefsResult<Option<bool>>;

    /// Write a boolean value
    fn put_bool(&self, key: &str, value: bool) -> PrefsResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StoredValue {
    Text(String),
    Flag(bool),
}

/// In-memory preferences backend
///
/// Default implementation, available on all platforms. Nothing survives the process.
#[derive(Clone, Default)]
pub struct InMemoryPreferencesBackend {
    values: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl InMemoryPreferencesBackend {
    /// Create an empty in-memory backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is present, regardless of its type
    pub fn contains_key(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl PreferencesBackend for InMemoryPreferencesBackend {
    fn get_string(&self, key: &str) -> PrefsResult<Option<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        match values.get(key) {
            None => Ok(None),
            Some(StoredValue::Text(text)) => Ok(Some(text.clone())),
            Some(StoredValue::Flag(_)) => Err(PrefsError::TypeMismatch {
                key: key.to_string(),
                expected: "string".to_string(),
            }),
        }
    }

    fn put_string(&self, key: &str, value: Option<&str>) -> PrefsResult<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        match value {
            Some(text) => {
                values.insert(key.to_string(), StoredValue::Text(text.to_string()));
            }
            None => {
                values.remove(key);
            }
        }
        Ok(())
    }

    fn get_bool(&self, key: &str) -> PrefsResult<Option<bool>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        match values.get(key) {
            None => Ok(None),
            Some(StoredValue::Flag(flag)) => Ok(Some(*flag)),
            Some(StoredValue::Text(_)) => Err(PrefsError::TypeMismatch {
                key: key.to_string(),
                expected: "bool".to_string(),
            }),
        }
    }

    fn put_bool(&self, key: &str, value: bool) -> PrefsResult<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), StoredValue::Flag(value));
        Ok(())
    }
}
