//! Storage and collaborator abstraction trait definitions

mod account_source;
mod preferences_backend;
mod profile_listener;

pub use account_source::{AccountChangeListener, AccountSource};
pub use preferences_backend::{InMemoryPreferencesBackend, PreferencesBackend};
pub use profile_listener::ProfileChangeListener;
