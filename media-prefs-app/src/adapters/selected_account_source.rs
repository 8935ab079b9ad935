//! In-process account source
//!
//! Holds the selected account for hosts whose sign-in flow lives in the same
//! process, and fans selection changes out to subscribers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use media_prefs_core::traits::{AccountChangeListener, AccountSource};
use media_prefs_core::types::{Account, SubscriptionId};

type Subscribers = Vec<(SubscriptionId, Arc<dyn AccountChangeListener>)>;

/// Account source driven by `select_account`.
pub struct SelectedAccountSource {
    selected: RwLock<Option<Account>>,
    subscribers: RwLock<Subscribers>,
    next_id: AtomicU64,
}

impl SelectedAccountSource {
    #[must_use]
    pub fn new() -> Self {
        Self::with_account(None)
    }

    /// Start with `account` already selected.
    #[must_use]
    pub fn with_account(account: Option<Account>) -> Self {
        Self {
            selected: RwLock::new(account),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Change the selection and notify subscribers in subscription order.
    ///
    /// Subscribers are called without any lock held.
    pub fn select_account(&self, account: Option<Account>) {
        let notified = account.clone();
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = account;
        log::debug!(
            "Selected account changed: {}",
            notified
                .as_ref()
                .and_then(|a| a.name.as_deref())
                .unwrap_or("<none>")
        );

        let subscribers: Vec<_> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in subscribers {
            listener.on_account_changed(notified.as_ref());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for SelectedAccountSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountSource for SelectedAccountSource {
    fn selected_account(&self) -> Option<Account> {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self, listener: Arc<dyn AccountChangeListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(subscribed, _)| *subscribed != id);
    }
}
