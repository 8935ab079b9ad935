//! Account selection source abstract Trait

use std::sync::Arc;

use crate::types::{Account, SubscriptionId};

/// Receives account selection changes
pub trait AccountChangeListener: Send + Sync {
    /// Called after the selected account changed, `None` when signed out
    fn on_account_changed(&self, account: Option<&Account>);
}

/// Source of the currently selected account Trait
///
/// Platform implementation:
/// - In-process: `SelectedAccountSource` (media-prefs-app)
/// - Hosts with an identity service wrap it behind this trait
pub trait AccountSource: Send + Sync {
    /// Currently selected account
    fn selected_account(&self) -> Option<Account>;

    /// Register a listener for account changes
    ///
    /// # Returns
    /// Handle to pass to `unsubscribe`
    fn subscribe(&self, listener: Arc<dyn AccountChangeListener>) -> SubscriptionId;

    /// Remove a listener registered with `subscribe`, unknown ids are ignored
    fn unsubscribe(&self, id: SubscriptionId);
}
