//! The shared resource cache.
//!
//! One [`Cache`] is constructed per client (and per test) and cloned into
//! every hook. Entries hold the last-known JSON for a [`CacheKey`] and
//! broadcast a [`Snapshot`] to subscribers over a `watch` channel whenever
//! a fetch starts or finishes.
//!
//! # Fetch lifecycle
//!
//! - At most one request per key is in flight; further revalidations of the
//!   same key join the pending one.
//! - A failed fetch keeps the previous data and records the error.
//! - Invalidation bumps the entry's generation. A response for an older
//!   generation is discarded and the key is refetched, so data read before
//!   a write is never presented as fresh after it.
//! - Entries are only removed by [`Cache::collect_garbage`], and only once
//!   nothing subscribes to them and nothing is in flight.

mod key;
mod options;

pub use key::CacheKey;
pub use options::{FetchOptions, RetryPolicy};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use payloads::APIClient;
use serde_json::Value;
use tokio::sync::watch;

use crate::FetchError;

/// What a subscriber sees of one cache entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Last successfully fetched body, kept across failed and in-flight
    /// fetches.
    pub data: Option<Arc<Value>>,
    /// Error from the most recent fetch, cleared by the next success.
    pub error: Option<FetchError>,
    /// A fetch for this key is in flight.
    pub is_validating: bool,
}

impl Snapshot {
    /// Fetching with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.is_validating
    }
}

struct Entry {
    state: watch::Sender<Snapshot>,
    subscribers: HashMap<u64, FetchOptions>,
    /// Generation the in-flight request was issued for.
    in_flight: Option<u64>,
    generation: u64,
    stale: bool,
    retry_attempt: u32,
}

impl Entry {
    fn new() -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        Self {
            state,
            subscribers: HashMap::new(),
            in_flight: None,
            generation: 0,
            stale: true,
            retry_attempt: 0,
        }
    }

    fn retry_policy(&self) -> Option<RetryPolicy> {
        self.subscribers.values().find_map(|options| options.retry)
    }
}

struct CacheInner {
    client: APIClient,
    entries: Mutex<HashMap<CacheKey, Entry>>,
    next_subscriber: AtomicU64,
}

/// Process-wide store of fetched resources, shared by cloning.
///
/// Fetches are spawned onto the tokio runtime, so subscribing and
/// revalidating must happen inside one.
#[derive(Clone)]
pub struct Cache {
    inner: Arc<CacheInner>,
}

impl Cache {
    pub fn new(client: APIClient) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                client,
                entries: Mutex::new(HashMap::new()),
                next_subscriber: AtomicU64::new(0),
            }),
        }
    }

    pub fn client(&self) -> &APIClient {
        &self.inner.client
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register interest in `key`, fetching it if there is no fresh data.
    ///
    /// The returned [`Subscription`] unregisters itself on drop; results
    /// arriving afterwards only update the entry.
    pub fn subscribe(&self, key: CacheKey, options: FetchOptions) -> Subscription {
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let (receiver, needs_fetch) = {
            let mut entries = self.entries();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.subscribers.insert(id, options);
            let needs_fetch = entry.stale || entry.state.borrow().data.is_none();
            (entry.state.subscribe(), needs_fetch)
        };
        if needs_fetch {
            self.revalidate(&key);
        }
        Subscription {
            cache: self.clone(),
            key,
            id,
            receiver,
        }
    }

    fn unsubscribe(&self, key: &CacheKey, id: u64) {
        if let Some(entry) = self.entries().get_mut(key) {
            entry.subscribers.remove(&id);
        }
    }

    /// Start fetching `key` unless a request for it is already in flight.
    ///
    /// Returns immediately; returns whether a new request was issued.
    pub fn revalidate(&self, key: &CacheKey) -> bool {
        let generation = {
            let mut entries = self.entries();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            if entry.in_flight.is_some() {
                return false;
            }
            entry.in_flight = Some(entry.generation);
            entry.state.send_modify(|state| state.is_validating = true);
            entry.generation
        };

        tracing::debug!(%key, generation, "fetching");
        let cache = self.clone();
        let key = key.clone();
        tokio::spawn(async move {
            let result = cache
                .inner
                .client
                .get_json(key.path(), key.term())
                .await
                .map_err(FetchError::from);
            cache.finish_fetch(&key, generation, result);
        });
        true
    }

    fn finish_fetch(
        &self,
        key: &CacheKey,
        generation: u64,
        result: Result<Value, FetchError>,
    ) {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        entry.in_flight = None;

        if generation != entry.generation {
            if entry.subscribers.is_empty() {
                entry.state.send_modify(|state| state.is_validating = false);
                return;
            }
            drop(entries);
            tracing::debug!(%key, generation, "discarding superseded response");
            self.revalidate(key);
            return;
        }

        match result {
            Ok(value) => {
                tracing::debug!(%key, generation, "fetched");
                entry.stale = false;
                entry.retry_attempt = 0;
                entry.state.send_modify(|state| {
                    state.data = Some(Arc::new(value));
                    state.error = None;
                    state.is_validating = false;
                });
            }
            Err(error) => {
                tracing::warn!(%key, %error, "fetch failed");
                let policy = entry.retry_policy();
                let delay =
                    policy.and_then(|policy| policy.delay_for(entry.retry_attempt));
                entry.state.send_modify(|state| {
                    state.error = Some(error);
                    state.is_validating = false;
                });
                match delay {
                    Some(delay) => {
                        entry.retry_attempt += 1;
                        drop(entries);
                        self.schedule_retry(key.clone(), delay);
                    }
                    None if policy.is_some() => {
                        tracing::error!(
                            %key,
                            attempts = entry.retry_attempt + 1,
                            "giving up on fetch after retries"
                        );
                    }
                    None => {}
                }
            }
        }
    }

    fn schedule_retry(&self, key: CacheKey, delay: Duration) {
        tracing::debug!(%key, ?delay, "scheduling retry");
        let cache = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let still_wanted = cache
                .entries()
                .get(&key)
                .is_some_and(|entry| !entry.subscribers.is_empty());
            if still_wanted {
                cache.revalidate(&key);
            }
        });
    }

    /// Mark `key` stale and, if anything subscribes to it, refetch and wait
    /// for the refetch to settle. Unsubscribed entries are refetched on
    /// their next subscription instead.
    pub async fn invalidate(&self, key: &CacheKey) {
        let receiver = {
            let mut entries = self.entries();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };
            entry.generation += 1;
            entry.stale = true;
            entry.retry_attempt = 0;
            if entry.subscribers.is_empty() {
                return;
            }
            entry.state.subscribe()
        };
        tracing::debug!(%key, "invalidated");
        self.revalidate(key);
        settle(receiver).await;
    }

    /// Invalidate several keys concurrently.
    pub async fn invalidate_all(&self, keys: &[CacheKey]) {
        futures::future::join_all(keys.iter().map(|key| self.invalidate(key)))
            .await;
    }

    /// The client regained focus: refetch keys whose subscribers opted in.
    pub fn on_focus(&self) {
        self.revalidate_where(|options| options.revalidate_on_focus);
    }

    /// The network came back: refetch keys whose subscribers opted in.
    pub fn on_reconnect(&self) {
        self.revalidate_where(|options| options.revalidate_on_reconnect);
    }

    fn revalidate_where(&self, wants: impl Fn(&FetchOptions) -> bool) {
        let keys: Vec<CacheKey> = self
            .entries()
            .iter()
            .filter(|(_, entry)| entry.subscribers.values().any(&wants))
            .map(|(key, _)| key.clone())
            .collect();
        for key in keys {
            self.revalidate(&key);
        }
    }

    /// Drop entries nobody subscribes to and nothing is fetching. Returns
    /// how many were removed.
    pub fn collect_garbage(&self) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| {
            !entry.subscribers.is_empty() || entry.in_flight.is_some()
        });
        before - entries.len()
    }

    /// The entry's current state, if it exists.
    pub fn snapshot(&self, key: &CacheKey) -> Option<Snapshot> {
        self.entries()
            .get(key)
            .map(|entry| entry.state.borrow().clone())
    }

    /// The entry's last-known data.
    pub fn peek(&self, key: &CacheKey) -> Option<Arc<Value>> {
        self.snapshot(key).and_then(|snapshot| snapshot.data)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries().contains_key(key)
    }

    pub fn subscriber_count(&self, key: &CacheKey) -> usize {
        self.entries()
            .get(key)
            .map_or(0, |entry| entry.subscribers.len())
    }
}

async fn settle(mut receiver: watch::Receiver<Snapshot>) -> Snapshot {
    let settled = receiver
        .wait_for(|state| !state.is_validating)
        .await
        .map(|state| (*state).clone());
    settled.unwrap_or_else(|_| receiver.borrow().clone())
}

/// A live registration on one cache entry.
///
/// This is the "mounted" marker for a hook: while it exists the entry is
/// kept, revalidated on focus/reconnect and retried per the subscriber's
/// options. Dropping it unregisters.
pub struct Subscription {
    cache: Cache,
    key: CacheKey,
    id: u64,
    receiver: watch::Receiver<Snapshot>,
}

impl Subscription {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn snapshot(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Schedule a refetch and return immediately.
    pub fn refresh(&self) -> bool {
        self.cache.revalidate(&self.key)
    }

    /// Wait for the next change to the entry. Returns `false` if the entry
    /// was removed.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until no fetch is in flight and return the resulting state.
    pub async fn settled(&self) -> Snapshot {
        settle(self.receiver.clone()).await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key, self.id);
    }
}
