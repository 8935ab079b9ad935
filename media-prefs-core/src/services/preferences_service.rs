//! Preferences service
//!
//! Facade over a `PreferencesBackend` that scopes selected settings per user
//! profile, suppresses redundant writes and tells listeners when the active
//! profile changes.

use std::sync::{Arc, Mutex, RwLock, Weak};

use crate::error::PrefsError;
use crate::traits::{AccountChangeListener, AccountSource, PreferencesBackend, ProfileChangeListener};
use crate::types::{Account, ProfileName, SubscriptionId};

use super::change_tracker::ChangeTracker;
use super::listener_registry::ListenerRegistry;
use super::{lock, read, write};

// Persisted key names, stable across versions
const MULTI_PROFILES: &str = "multi_profiles";
const STATE_UPDATER_DATA: &str = "state_updater_data";
const WEB_PROXY_URI: &str = "web_proxy_uri";
const WEB_PROXY_ENABLED: &str = "web_proxy_enabled";

fn report_backend_error(action: &str, key: &str, err: &PrefsError) {
    if err.is_expected() {
        log::warn!("Failed to {action} preference {key}: {err}");
    } else {
        log::error!("Failed to {action} preference {key}: {err}");
    }
}

/// Forwards account changes without keeping the service alive.
struct AccountForwarder {
    prefs: Weak<PreferencesService>,
}

impl AccountChangeListener for AccountForwarder {
    fn on_account_changed(&self, account: Option<&Account>) {
        if let Some(prefs) = self.prefs.upgrade() {
            prefs.on_account_changed(account);
        }
    }
}

/// Profile-aware preferences facade
///
/// Constructed once by the composition root and shared as `Arc`. Account changes
/// are only observed between `start` and `stop`.
pub struct PreferencesService {
    me: Weak<PreferencesService>,
    backend: Arc<dyn PreferencesBackend>,
    account_source: Arc<dyn AccountSource>,
    profile: RwLock<Option<ProfileName>>,
    change_tracker: Mutex<ChangeTracker>,
    listeners: RwLock<ListenerRegistry>,
    boot_resolution: RwLock<Option<String>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl PreferencesService {
    /// Create a preferences service instance
    ///
    /// Has no side effects: call `start` to follow the account source.
    #[must_use]
    pub fn new(
        backend: Arc<dyn PreferencesBackend>,
        account_source: Arc<dyn AccountSource>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            backend,
            account_source,
            profile: RwLock::new(None),
            change_tracker: Mutex::new(ChangeTracker::default()),
            listeners: RwLock::new(ListenerRegistry::default()),
            boot_resolution: RwLock::new(None),
            subscription: Mutex::new(None),
        })
    }

    // ===== Life cycle =====

    /// Subscribe to account changes and apply the currently selected account.
    pub fn start(&self) {
        {
            let mut subscription = lock(&self.subscription);
            if subscription.is_some() {
                log::warn!("Preferences service already started");
                return;
            }
            let forwarder = Arc::new(AccountForwarder {
                prefs: self.me.clone(),
            });
            *subscription = Some(self.account_source.subscribe(forwarder));
        }
        log::info!("Preferences service started");

        // Trigger on current account
        let current = self.account_source.selected_account();
        self.on_account_changed(current.as_ref());
    }

    /// Stop following account changes. Safe to call more than once.
    pub fn stop(&self) {
        let subscription = lock(&self.subscription).take();
        if let Some(id) = subscription {
            self.account_source.unsubscribe(id);
            log::info!("Preferences service stopped");
        }
    }

    pub fn is_started(&self) -> bool {
        lock(&self.subscription).is_some()
    }

    // ===== Profiles =====

    /// Turn multi-profile mode on or off and reselect the profile accordingly.
    pub fn enable_multi_profiles(&self, enabled: bool) {
        if let Err(e) = self.backend.put_bool(MULTI_PROFILES, enabled) {
            report_backend_error("write", MULTI_PROFILES, &e);
        }

        let account = if enabled {
            self.account_source.selected_account()
        } else {
            None
        };
        self.select_account(account.as_ref());
    }

    pub fn is_multi_profiles_enabled(&self) -> bool {
        self.get_bool(MULTI_PROFILES, false)
    }

    /// Currently active profile, `None` when settings are not scoped
    pub fn active_profile(&self) -> Option<ProfileName> {
        read(&self.profile).clone()
    }

    fn select_account(&self, account: Option<&Account>) {
        self.select_profile(account.and_then(ProfileName::from_account));
    }

    /// Store the profile and notify listeners, even when the profile did not change.
    fn select_profile(&self, profile: Option<ProfileName>) {
        let profile = match profile {
            None if self.is_multi_profiles_enabled() => Some(ProfileName::anonymous()),
            other => other,
        };

        match &profile {
            Some(name) => log::debug!("Selected profile: {name}"),
            None => log::debug!("Profile scoping cleared"),
        }
        *write(&self.profile) = profile;

        self.notify_profile_changed();
    }

    fn notify_profile_changed(&self) {
        // Snapshot so listeners may (un)register without holding the lock
        let listeners = read(&self.listeners).snapshot();
        for listener in listeners {
            listener.on_profile_changed();
        }
    }

    fn profile_key(&self, key: &str) -> String {
        match read(&self.profile).as_ref() {
            Some(profile) => profile.scoped_key(key),
            None => key.to_string(),
        }
    }

    // ===== Listeners =====

    /// Register a regular listener, notified after all data listeners.
    pub fn add_listener(&self, listener: Arc<dyn ProfileChangeListener>) {
        if !write(&self.listeners).add_regular(listener) {
            log::debug!("Profile listener already registered");
        }
    }

    /// Register a data listener, notified before every listener registered earlier.
    pub fn add_data_listener(&self, listener: Arc<dyn ProfileChangeListener>) {
        if !write(&self.listeners).add_data(listener) {
            log::debug!("Profile listener already registered");
        }
    }

    pub fn remove_listener(&self, listener: &Arc<dyn ProfileChangeListener>) {
        write(&self.listeners).remove(listener);
    }

    pub fn listener_count(&self) -> usize {
        read(&self.listeners).len()
    }

    // ===== Profile scoped data =====

    /// Write under the active profile's key.
    pub fn set_profile_data(&self, key: &str, value: Option<&str>) {
        let scoped = self.profile_key(key);
        self.set_data(&scoped, value);
    }

    /// Read the active profile's value, falling back to the unscoped one.
    pub fn get_profile_data(&self, key: &str) -> Option<String> {
        let scoped = self.profile_key(key);
        self.get_data(&scoped).or_else(|| {
            if scoped == key {
                None
            } else {
                self.get_data(key)
            }
        })
    }

    // ===== Unscoped data =====

    /// Write `value` unless it matches the last value written for `key`.
    ///
    /// `None` removes the key.
    pub fn set_data(&self, key: &str, value: Option<&str>) {
        let mut tracker = lock(&self.change_tracker);
        let Some(hash) = tracker.changed_hash(key, value) else {
            log::debug!("Skipping unchanged preference {key}");
            return;
        };

        match self.backend.put_string(key, value) {
            Ok(()) => tracker.record(key, hash),
            Err(e) => report_backend_error("write", key, &e),
        }
    }

    /// Read `key` straight from the backend.
    pub fn get_data(&self, key: &str) -> Option<String> {
        // Hashes are only tracked on write, the stored value may predate this process
        self.get_string(key)
    }

    // ===== Scalar settings =====

    /// Kept in memory for the lifetime of the process only.
    pub fn set_boot_resolution(&self, resolution: Option<String>) {
        *write(&self.boot_resolution) = resolution;
    }

    pub fn boot_resolution(&self) -> Option<String> {
        read(&self.boot_resolution).clone()
    }

    pub fn set_state_updater_data(&self, data: Option<&str>) {
        self.put_string(STATE_UPDATER_DATA, data);
    }

    pub fn state_updater_data(&self) -> Option<String> {
        self.get_string(STATE_UPDATER_DATA)
    }

    pub fn set_web_proxy_uri(&self, uri: &str) {
        self.put_string(WEB_PROXY_URI, Some(uri));
    }

    pub fn web_proxy_uri(&self) -> String {
        self.get_string(WEB_PROXY_URI).unwrap_or_default()
    }

    pub fn set_web_proxy_enabled(&self, enabled: bool) {
        if let Err(e) = self.backend.put_bool(WEB_PROXY_ENABLED, enabled) {
            report_backend_error("write", WEB_PROXY_ENABLED, &e);
        }
    }

    pub fn is_web_proxy_enabled(&self) -> bool {
        self.get_bool(WEB_PROXY_ENABLED, false)
    }

    // ===== Backend access =====

    fn get_string(&self, key: &str) -> Option<String> {
        self.backend.get_string(key).unwrap_or_else(|e| {
            report_backend_error("read", key, &e);
            None
        })
    }

    fn put_string(&self, key: &str, value: Option<&str>) {
        if let Err(e) = self.backend.put_string(key, value) {
            report_backend_error("write", key, &e);
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.backend.get_bool(key) {
            Ok(value) => value.unwrap_or(default),
            Err(e) => {
                report_backend_error("read", key, &e);
                default
            }
        }
    }
}

impl AccountChangeListener for PreferencesService {
    /// Follow the account only while multi-profile mode is on.
    fn on_account_changed(&self, account: Option<&Account>) {
        if self.is_multi_profiles_enabled() {
            self.select_account(account);
        }
    }
}
