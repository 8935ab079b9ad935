//! Profile change listener Trait

/// Notified synchronously whenever a profile is selected.
///
/// Listeners run on the thread that triggered the selection.
pub trait ProfileChangeListener: Send + Sync {
    fn on_profile_changed(&self);
}
