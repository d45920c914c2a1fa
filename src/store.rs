use indexmap::IndexMap;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::watch;

use crate::config::StoreConfig;
use crate::entry::Entry;
use crate::matcher::deep_equal;

/// Error type for set operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    /// A per-call TTL override was supplied, but the store was constructed
    /// without a default TTL. Overrides require a default TTL on the
    /// instance, even though the override itself need not equal it.
    ///
    /// This is a programmer error (API misuse), not a transient condition.
    #[error("a per-call TTL requires a default TTL to be configured on the store")]
    InvalidConfiguration,
}

/// Internal shared state for the store
struct StoreInner {
    /// Insertion-ordered map; `key(i)` indexes into this order.
    map: Mutex<IndexMap<String, Entry>>,
    /// TTL applied when no per-call override is given. `None` disables
    /// expiration, overrides, and the background sweep task.
    default_ttl: Option<Duration>,
    /// Sender to signal shutdown to the sweep task
    shutdown_tx: watch::Sender<bool>,
}

impl StoreInner {
    /// Locks the entry map, recovering from poisoning.
    ///
    /// Every critical section leaves the map in a consistent state, so a
    /// panic in another thread cannot have corrupted it.
    fn lock_map(&self) -> MutexGuard<'_, IndexMap<String, Entry>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory key-value store with a browser-style storage interface and
/// per-entry TTL expiration.
///
/// Keys keep their insertion order, so entries can be addressed by index
/// with [`key`](SessionStore::key). Values are JSON
/// ([`serde_json::Value`]), shared via `Arc` so reads never deep-copy.
///
/// Expired entries are reclaimed two ways: point reads
/// ([`get_item`](SessionStore::get_item), [`has`](SessionStore::has))
/// lazily remove the one stale entry they touch, while whole-store
/// operations ([`len`](SessionStore::len), [`key`](SessionStore::key),
/// [`includes`](SessionStore::includes)) sweep every expired entry first so
/// their counts and ordering never observe a stale entry. When a default
/// TTL is configured, a background task additionally sweeps the store every
/// [`sweep_interval`](StoreConfig::sweep_interval), reclaiming entries that
/// are never read again. The task stops when [`clear`](SessionStore::clear)
/// is called or the last handle to the store is dropped.
///
/// Cloning a `SessionStore` creates a new handle to the same underlying
/// data.
///
/// # Example
///
/// ```rust,no_run
/// use session_store::{SessionStore, StoreConfig};
/// use serde_json::json;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = StoreConfig::default()
///         .with_default_ttl(Duration::from_secs(300))
///         .with_sweep_interval(Duration::from_secs(30));
///     let store = SessionStore::with_config(config);
///
///     store.set_item("session:abc", json!({ "user": 123 }));
///     assert!(store.has("session:abc"));
/// }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl SessionStore {
    /// Creates a new store with default configuration: no default TTL, so
    /// entries never expire and no background task is spawned.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a new store with custom configuration
    ///
    /// If the configuration carries a default TTL, a background sweep task
    /// is spawned that reclaims expired entries every
    /// [`sweep_interval`](StoreConfig::sweep_interval). Without a default
    /// TTL no entry can expire, so no task is started and no runtime is
    /// needed.
    ///
    /// # Panics
    ///
    /// Panics if a default TTL is configured and this is called outside of
    /// a Tokio runtime context. The store requires a runtime to spawn its
    /// background sweep task.
    pub fn with_config(config: StoreConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let inner = Arc::new(StoreInner {
            map: Mutex::new(IndexMap::new()),
            default_ttl: config.default_ttl,
            shutdown_tx,
        });

        if config.default_ttl.is_some() {
            // Verify that a Tokio runtime is available before proceeding.
            // This provides a clear error message instead of a cryptic panic
            // from tokio::spawn.
            if tokio::runtime::Handle::try_current().is_err() {
                panic!(
                    "session_store::SessionStore requires a Tokio runtime when \
                     a default TTL is configured. Ensure you are calling \
                     SessionStore::with_config() from within a #[tokio::main] \
                     or #[tokio::test] context, or from code running on a \
                     Tokio runtime."
                );
            }

            // The task gets a weak handle only: a strong one would keep the
            // store alive after the last SessionStore is dropped, leaving
            // the task ticking against an unreachable map forever.
            let sweep_inner = Arc::downgrade(&inner);
            tokio::spawn(Self::sweep_task(
                sweep_inner,
                config.sweep_interval,
                shutdown_rx,
            ));
        }

        Self { inner }
    }

    /// Background task that periodically sweeps expired entries.
    ///
    /// Holds only a weak handle to the store state, so it stops on its next
    /// tick once every `SessionStore` handle is gone; dropping the store
    /// also drops the shutdown sender, which ends the task immediately.
    async fn sweep_task(
        inner: Weak<StoreInner>,
        interval: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        tracing::debug!(?interval, "background sweep task started");

        let mut ticker = tokio::time::interval(interval);
        // Skip the first immediate tick - we want to wait for the interval first
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(inner) = inner.upgrade() else {
                        // Last store handle dropped
                        break;
                    };
                    Self::sweep_internal(&inner);
                }
                changed = shutdown_rx.changed() => {
                    // Err means the sender (the store) is gone; true means
                    // clear() cancelled the task.
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("background sweep task stopped");
    }

    /// Internal sweep logic (shared between manual, read-path and background
    /// sweeps). Removes every expired entry, preserving the insertion order
    /// of the survivors, and returns how many were reclaimed.
    fn sweep_internal(inner: &StoreInner) -> usize {
        let mut map = inner.lock_map();
        let before = map.len();
        map.retain(|_, entry| !entry.is_expired());
        let removed = before - map.len();

        if removed > 0 {
            tracing::debug!(removed, "swept expired entries");
        }

        removed
    }

    /// Computes the expiration time for a new entry.
    ///
    /// This runs before any mutation, so a rejected set leaves the store
    /// unchanged.
    fn expiry_for(&self, ttl_override: Option<Duration>) -> Result<Option<Instant>, SetError> {
        if ttl_override.is_some() && self.inner.default_ttl.is_none() {
            return Err(SetError::InvalidConfiguration);
        }
        let effective = ttl_override.or(self.inner.default_ttl);
        Ok(effective.map(|ttl| Instant::now() + ttl))
    }

    /// Stores a value under the given key.
    ///
    /// The store's default TTL applies, if one is configured; otherwise the
    /// entry never expires. If the key already exists its value and expiry
    /// are replaced, but the key keeps its original position in insertion
    /// order.
    pub fn set_item(&self, key: impl Into<String>, value: impl Into<Value>) {
        // Without an override the policy check cannot reject.
        let _ = self.insert(key.into(), value.into(), None);
    }

    /// Stores a value with a per-call TTL that overrides the default.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::InvalidConfiguration`] if the store was
    /// constructed without a default TTL. The check runs before insertion,
    /// so on error the store is left untouched.
    pub fn set_item_with_ttl(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
        ttl: Duration,
    ) -> Result<(), SetError> {
        self.insert(key.into(), value.into(), Some(ttl))
    }

    /// Shared insert path for both set operations: one policy check, then
    /// the upsert.
    fn insert(&self, key: String, value: Value, ttl_override: Option<Duration>) -> Result<(), SetError> {
        let expires_at = self.expiry_for(ttl_override)?;
        let entry = Entry::new(Arc::new(value), expires_at);
        self.inner.lock_map().insert(key, entry);
        Ok(())
    }

    /// Stores a value that expired in the past (for testing purposes)
    #[cfg(test)]
    fn set_expired(&self, key: impl Into<String>, value: impl Into<Value>) {
        let expires_at = Instant::now() - Duration::from_secs(1);
        let entry = Entry::new(Arc::new(value.into()), Some(expires_at));
        self.inner.lock_map().insert(key.into(), entry);
    }

    /// Retrieves a value by key
    ///
    /// Returns `None` if the key doesn't exist or has expired. An expired
    /// entry found here is removed on the spot, without waiting for the
    /// next sweep.
    pub fn get_item(&self, key: &str) -> Option<Arc<Value>> {
        let mut map = self.inner.lock_map();
        let entry = map.get(key)?;
        if entry.is_expired() {
            // shift_remove keeps the insertion order of the remaining keys
            map.shift_remove(key);
            return None;
        }
        Some(entry.value_shared())
    }

    /// Checks if a key exists and is not expired.
    ///
    /// Expired entries are lazily removed when checked.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        let mut map = self.inner.lock_map();
        let Some(entry) = map.get(key) else {
            return false;
        };
        if entry.is_expired() {
            map.shift_remove(key);
            return false;
        }
        true
    }

    /// Checks whether any stored value structurally deep-equals `value`.
    ///
    /// Sweeps all expired entries first, so a stale value can never match.
    /// Comparison is [`deep_equal`]: field-name sets and recursive field
    /// values for objects, positional traversal for arrays, plain equality
    /// for primitives.
    ///
    /// This scans every entry in the store.
    #[must_use]
    pub fn includes(&self, value: &Value) -> bool {
        Self::sweep_internal(&self.inner);
        self.inner
            .lock_map()
            .values()
            .any(|entry| deep_equal(entry.value(), value))
    }

    /// Returns the key at `index` in insertion order, or `None` if the
    /// index is out of range.
    ///
    /// Sweeps all expired entries first, so indexing reflects only live
    /// entries at the moment of the call.
    pub fn key(&self, index: usize) -> Option<String> {
        Self::sweep_internal(&self.inner);
        self.inner
            .lock_map()
            .get_index(index)
            .map(|(key, _)| key.clone())
    }

    /// Returns a snapshot of all live keys in insertion order.
    ///
    /// Sweeps all expired entries first.
    pub fn keys(&self) -> Vec<String> {
        Self::sweep_internal(&self.inner);
        self.inner.lock_map().keys().cloned().collect()
    }

    /// Removes a key from the store
    ///
    /// Returns `true` if the key was present (regardless of expiration),
    /// `false` otherwise. The insertion order of the remaining keys is
    /// preserved.
    pub fn remove_item(&self, key: &str) -> bool {
        self.inner.lock_map().shift_remove(key).is_some()
    }

    /// Removes all entries and cancels the background sweep task.
    ///
    /// The store remains usable afterwards: its TTL configuration is
    /// retained, new entries still pick up the default TTL, and reads still
    /// reclaim stale entries lazily. Only the periodic background sweeping
    /// stops. A sweep tick already scheduled before the cancellation may
    /// still fire once against the emptied store, which is harmless.
    pub fn clear(&self) {
        self.inner.lock_map().clear();
        let _ = self.inner.shutdown_tx.send(true);
    }

    /// Returns the number of live entries in the store.
    ///
    /// Sweeps all expired entries first, so the count never includes a
    /// stale entry.
    #[must_use]
    pub fn len(&self) -> usize {
        Self::sweep_internal(&self.inner);
        self.inner.lock_map().len()
    }

    /// Returns `true` if the store holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Manually sweeps all expired entries
    ///
    /// Returns the number of entries removed.
    ///
    /// Note: this also happens automatically on whole-store reads, and
    /// periodically in the background when a default TTL is configured.
    pub fn sweep(&self) -> usize {
        Self::sweep_internal(&self.inner)
    }

    /// Returns the default TTL this store was configured with, if any
    pub fn default_ttl(&self) -> Option<Duration> {
        self.inner.default_ttl
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
