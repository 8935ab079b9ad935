//! Platform-agnostic application bootstrap for media player preferences.
//!
//! Provides `AppPrefs` (owns the preferences service and its account source),
//! `AppPrefsBuilder` (adapter injection) and the stock adapters.

pub mod adapters;
pub mod config;

use std::sync::Arc;

use media_prefs_core::error::{PrefsError, PrefsResult};
use media_prefs_core::services::PreferencesService;
use media_prefs_core::traits::{AccountSource, PreferencesBackend};

use adapters::{JsonFileStore, SelectedAccountSource};
pub use config::StoreConfig;

/// Application-wide preferences state.
///
/// Every frontend constructs this once at startup via `AppPrefsBuilder`, then
/// calls `start` to begin following the selected account.
pub struct AppPrefs {
    /// Preferences facade
    pub preferences: Arc<PreferencesService>,
    /// Account source the facade follows
    pub account_source: Arc<dyn AccountSource>,
}

impl AppPrefs {
    /// Subscribe to account changes and select the initial profile.
    pub fn start(&self) {
        self.preferences.start();
        match self.preferences.active_profile() {
            Some(profile) => log::info!("Preferences ready, active profile: {profile}"),
            None => log::info!("Preferences ready, no profile scoping"),
        }
    }

    /// Stop following account changes.
    pub fn shutdown(&self) {
        self.preferences.stop();
    }

    pub fn is_started(&self) -> bool {
        self.preferences.is_started()
    }
}

/// Builder for constructing `AppPrefs` with platform-specific adapters.
///
/// # Required adapters
/// - `backend` — where preferences are persisted
///
/// # Optional
/// - `account_source` — defaults to an empty `SelectedAccountSource`
pub struct AppPrefsBuilder {
    backend: Option<Arc<dyn PreferencesBackend>>,
    account_source: Option<Arc<dyn AccountSource>>,
}

impl AppPrefsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: None,
            account_source: None,
        }
    }

    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn PreferencesBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn account_source(mut self, source: Arc<dyn AccountSource>) -> Self {
        self.account_source = Some(source);
        self
    }

    /// Use a `JsonFileStore` at the configured location as backend.
    pub fn with_json_store(self, config: &StoreConfig) -> PrefsResult<Self> {
        let store = JsonFileStore::from_config(config)?;
        Ok(self.backend(Arc::new(store)))
    }

    /// Build the `AppPrefs`.
    ///
    /// # Errors
    /// Returns `PrefsError::ValidationError` if the backend is missing.
    pub fn build(self) -> PrefsResult<AppPrefs> {
        let backend = self
            .backend
            .ok_or_else(|| PrefsError::ValidationError("backend is required".to_string()))?;
        let account_source = self
            .account_source
            .unwrap_or_else(|| Arc::new(SelectedAccountSource::new()));

        let preferences = PreferencesService::new(backend, Arc::clone(&account_source));

        Ok(AppPrefs {
            preferences,
            account_source,
        })
    }
}

impl Default for AppPrefsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
