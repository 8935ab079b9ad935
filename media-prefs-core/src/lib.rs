//! Media Prefs Core Library
//!
//! Provides the preferences facade used by the media player, including:
//! - Profile-scoped key/value settings (Preferences Service)
//! - Redundant write suppression through a change hash cache
//! - Ordered profile change notification
//!
//! The storage engine and the account subsystem are abstracted through traits,
//! so the same facade runs on top of a JSON file, a database or an in-memory map.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_utils;

// Re-export common types
pub use error::{PrefsError, PrefsResult};
pub use services::PreferencesService;
pub use traits::{
    AccountChangeListener, AccountSource, InMemoryPreferencesBackend, PreferencesBackend,
    ProfileChangeListener,
};
pub use types::{Account, ProfileName, SubscriptionId};
