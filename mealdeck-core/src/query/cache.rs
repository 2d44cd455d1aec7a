//! Keyed query cache with in-flight de-duplication.
//!
//! Values are stored as JSON and decoded on read, so one cache can hold every
//! query's output type. Each key owns a slot; fetching holds the slot's lock,
//! so there is at most one request in flight per key and callers that queued
//! behind it reuse its result. Slots nobody has asked for within the GC time
//! are dropped whenever a fetch stores a new value.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info_span, Instrument};

use crate::error::QueryError;

/// Identifies a query: operation name followed by its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(operation: &str) -> Self {
        Self(vec![operation.to_string()])
    }

    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.0.push(arg.to_string());
        self
    }

    pub fn operation(&self) -> &str {
        &self.0[0]
    }

    /// True when `prefix` matches the leading parts of this key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

struct Entry {
    value: Value,
    fetched_at: Instant,
    generation: u64,
}

#[derive(Default)]
struct Slot {
    /// Bumped by invalidation; entries from older generations are stale.
    generation: AtomicU64,
    /// Bumped after every successful fetch.
    completions: AtomicU64,
    /// Milliseconds since the client's epoch at the last `fetch` of this key.
    last_used: AtomicU64,
    state: Mutex<Option<Entry>>,
}

/// Cache shared by every query and mutation in the app.
///
/// Create one at startup and hand it to the query wrappers.
pub struct QueryClient {
    slots: DashMap<QueryKey, Arc<Slot>>,
    stale_time: Duration,
    gc_time: Duration,
    epoch: Instant,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            stale_time,
            gc_time: Duration::from_secs(crate::config::DEFAULT_GC_SECS).max(stale_time),
            epoch: Instant::now(),
        }
    }

    /// Set how long a slot may go unused before it is dropped. Never shorter
    /// than the stale time.
    pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time.max(self.stale_time);
        self
    }

    fn now_millis(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot> {
        let slot = self.slots.entry(key.clone()).or_default().clone();
        slot.last_used.store(self.now_millis(), Ordering::SeqCst);
        slot
    }

    /// Drop slots unused for longer than the GC time. Slots with a fetch in
    /// flight are kept. Returns the number of slots removed.
    pub fn sweep(&self) -> usize {
        let now = self.now_millis();
        let gc_millis = u64::try_from(self.gc_time.as_millis()).unwrap_or(u64::MAX);
        let before = self.slots.len();

        self.slots.retain(|_, slot| {
            let idle = now.saturating_sub(slot.last_used.load(Ordering::SeqCst));
            idle <= gc_millis || slot.state.try_lock().is_err()
        });

        let removed = before.saturating_sub(self.slots.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.slots.len(), "swept idle queries");
        }
        removed
    }

    /// Return the cached value for `key`, or run `fetcher` and cache its output.
    ///
    /// A cached value is reused while it is fresh: same generation and younger
    /// than the stale time. A caller that waited on an in-flight fetch reuses
    /// that fetch's value even when the stale time is zero. Failures are not
    /// cached.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, QueryError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, QueryError>>,
    {
        let slot = self.slot(key);
        let completions_before = slot.completions.load(Ordering::SeqCst);
        let mut state = slot.state.lock().await;
        let generation = slot.generation.load(Ordering::SeqCst);

        if let Some(entry) = state.as_ref() {
            let joined_in_flight = slot.completions.load(Ordering::SeqCst) != completions_before;
            let fresh = entry.fetched_at.elapsed() < self.stale_time;
            if entry.generation == generation && (joined_in_flight || fresh) {
                tracing::debug!(%key, joined_in_flight, "query cache hit");
                return decode(key, entry.value.clone());
            }
        }

        tracing::debug!(%key, "query cache miss, fetching");
        let output = fetcher()
            .instrument(info_span!("query", key = %key))
            .await?;

        let value = serde_json::to_value(&output).map_err(|e| QueryError::Decode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        *state = Some(Entry {
            value,
            fetched_at: Instant::now(),
            generation,
        });
        slot.completions.fetch_add(1, Ordering::SeqCst);
        drop(state);
        self.sweep();

        Ok(output)
    }

    /// Mark every entry whose key starts with `prefix` as stale.
    ///
    /// Does not wait for in-flight fetches; a fetch that started before the
    /// invalidation stores a value that is already stale.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for slot in self.slots.iter().filter(|slot| slot.key().starts_with(prefix)) {
            slot.generation.fetch_add(1, Ordering::SeqCst);
            count += 1;
        }
        tracing::debug!(%prefix, count, "invalidated queries");
        count
    }

    /// Invalidate `key` and fetch it again.
    pub async fn refetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, QueryError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, QueryError>>,
    {
        self.invalidate(key);
        self.fetch(key, fetcher).await
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn decode<T: DeserializeOwned>(key: &QueryKey, value: Value) -> Result<T, QueryError> {
    serde_json::from_value(value).map_err(|e| QueryError::Decode {
        key: key.to_string(),
        message: e.to_string(),
    })
}
