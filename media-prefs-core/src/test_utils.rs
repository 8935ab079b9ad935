//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{PrefsError, PrefsResult};
use crate::services::PreferencesService;
use crate::traits::{
    AccountChangeListener, AccountSource, InMemoryPreferencesBackend, PreferencesBackend,
    ProfileChangeListener,
};
use crate::types::{Account, SubscriptionId};

// ===== CountingBackend =====

/// In-memory backend that counts string writes per key
pub struct CountingBackend {
    inner: InMemoryPreferencesBackend,
    string_writes: Mutex<HashMap<String, usize>>,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self {
            inner: InMemoryPreferencesBackend::new(),
            string_writes: Mutex::new(HashMap::new()),
        }
    }

    pub fn string_writes(&self, key: &str) -> usize {
        self.string_writes
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PreferencesBackend for CountingBackend {
    fn get_string(&self, key: &str) -> PrefsResult<Option<String>> {
        self.inner.get_string(key)
    }

    fn put_string(&self, key: &str, value: Option<&str>) -> PrefsResult<()> {
        *self
            .string_writes
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_insert(0) += 1;
        self.inner.put_string(key, value)
    }

    fn get_bool(&self, key: &str) -> PrefsResult<Option<bool>> {
        self.inner.get_bool(key)
    }

    fn put_bool(&self, key: &str, value: bool) -> PrefsResult<()> {
        self.inner.put_bool(key, value)
    }
}

// ===== FailingBackend =====

/// In-memory backend whose writes can be switched to fail
pub struct FailingBackend {
    inner: InMemoryPreferencesBackend,
    fail_writes: AtomicBool,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self {
            inner: InMemoryPreferencesBackend::new(),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> PrefsResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PrefsError::StorageError("disk full".to_string()));
        }
        Ok(())
    }
}

impl PreferencesBackend for FailingBackend {
    fn get_string(&self, key: &str) -> PrefsResult<Option<String>> {
        self.inner.get_string(key)
    }

    fn put_string(&self, key: &str, value: Option<&str>) -> PrefsResult<()> {
        self.check_writable()?;
        self.inner.put_string(key, value)
    }

    fn get_bool(&self, key: &str) -> PrefsResult<Option<bool>> {
        self.inner.get_bool(key)
    }

    fn put_bool(&self, key: &str, value: bool) -> PrefsResult<()> {
        self.check_writable()?;
        self.inner.put_bool(key, value)
    }
}

// ===== MockAccountSource =====

pub struct MockAccountSource {
    selected: RwLock<Option<Account>>,
    subscribers: RwLock<Vec<(SubscriptionId, Arc<dyn AccountChangeListener>)>>,
    next_id: AtomicU64,
}

impl MockAccountSource {
    pub fn new() -> Self {
        Self {
            selected: RwLock::new(None),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Change the selected account and notify subscribers
    pub fn select(&self, account: Option<Account>) {
        let notified = account.clone();
        *self.selected.write().unwrap() = account;
        let subscribers: Vec<_> = self
            .subscribers
            .read()
            .unwrap()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in subscribers {
            listener.on_account_changed(notified.as_ref());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().unwrap().len()
    }
}

impl AccountSource for MockAccountSource {
    fn selected_account(&self) -> Option<Account> {
        self.selected.read().unwrap().clone()
    }

    fn subscribe(&self, listener: Arc<dyn AccountChangeListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.subscribers.write().unwrap().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .write()
            .unwrap()
            .retain(|(subscribed, _)| *subscribed != id);
    }
}

// ===== Listeners =====

/// Shared log of listener names in call order
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Appends its name to a `CallLog` when notified
pub struct RecordingListener {
    name: String,
    log: CallLog,
}

impl RecordingListener {
    pub fn arc(name: &str, log: &CallLog) -> Arc<dyn ProfileChangeListener> {
        Arc::new(Self {
            name: name.to_string(),
            log: log.clone(),
        })
    }
}

impl ProfileChangeListener for RecordingListener {
    fn on_profile_changed(&self) {
        self.log.push(&self.name);
    }
}

#[derive(Default)]
pub struct CountingListener {
    calls: AtomicUsize,
}

impl CountingListener {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProfileChangeListener for CountingListener {
    fn on_profile_changed(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `PreferencesService`（未调用 `start`）
pub fn create_test_service() -> (
    Arc<PreferencesService>,
    Arc<CountingBackend>,
    Arc<MockAccountSource>,
) {
    let backend = Arc::new(CountingBackend::new());
    let source = Arc::new(MockAccountSource::new());
    let service = PreferencesService::new(backend.clone(), source.clone());
    (service, backend, source)
}
