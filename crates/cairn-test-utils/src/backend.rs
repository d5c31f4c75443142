// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory keyed-store backend for deterministic testing.
//!
//! `MemoryKvBackend` implements the `KvBackend`/`KvBucket` contract over
//! per-bucket ordered maps: idempotent bucket creation, per-key TTL via an
//! injected clock, sorted prefix listing, and delete failure injection for
//! exercising partial-failure paths.
//!
//! TTL enforcement follows the injected clock, which tests control
//! separately from the clock the engines see. Keeping the backend's clock
//! still while advancing the engine's models a store whose expiry lags, which
//! is exactly the situation cairn's own expiry logic exists for.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use cairn_core::{CairnError, Clock, KvBackend, KvBucket, KvEntry, SystemClock};

struct StoredEntry {
    value: Vec<u8>,
    /// Deadline after which the entry is hidden and dropped.
    expires_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    fn live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// One in-memory bucket. Keys are held in a `BTreeMap` so prefix listings
/// come back in a stable order.
pub struct MemoryKvBucket {
    name: String,
    clock: Arc<dyn Clock>,
    entries: Mutex<BTreeMap<String, StoredEntry>>,
    /// Keys whose deletion should fail with a backend error.
    poisoned_deletes: Mutex<Vec<String>>,
}

impl MemoryKvBucket {
    fn new(name: &str, clock: Arc<dyn Clock>) -> Self {
        MemoryKvBucket {
            name: name.to_string(),
            clock,
            entries: Mutex::new(BTreeMap::new()),
            poisoned_deletes: Mutex::new(Vec::new()),
        }
    }

    /// Make every future `delete` whose key contains `fragment` fail.
    pub async fn poison_delete(&self, fragment: &str) {
        self.poisoned_deletes.lock().await.push(fragment.to_string());
    }

    /// Number of live entries, ignoring TTL-expired leftovers.
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|e| e.live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Raw key dump for assertions, expired entries included.
    pub async fn raw_keys(&self) -> Vec<String> {
        self.entries.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl KvBucket for MemoryKvBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CairnError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                // Expired: drop lazily, report absent.
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &[u8], ttl: Option<std::time::Duration>) -> Result<(), CairnError> {
        let expires_at = ttl.map(|ttl| self.clock.now() + ttl);
        self.entries.lock().await.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CairnError> {
        let poisoned = self.poisoned_deletes.lock().await;
        if poisoned.iter().any(|fragment| key.contains(fragment)) {
            return Err(CairnError::backend(std::io::Error::other(format!(
                "injected delete failure for {key}"
            ))));
        }
        drop(poisoned);

        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        match entries.remove(key) {
            Some(entry) => Ok(entry.live(now)),
            None => Ok(false),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, CairnError> {
        let now = self.clock.now();
        let entries = self.entries.lock().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entry)| entry.live(now))
            .map(|(key, entry)| KvEntry {
                key: key.clone(),
                value: entry.value.clone(),
            })
            .collect())
    }
}

/// In-memory [`KvBackend`] with idempotent bucket provisioning.
pub struct MemoryKvBackend {
    clock: Arc<dyn Clock>,
    buckets: DashMap<String, Arc<MemoryKvBucket>>,
}

impl MemoryKvBackend {
    /// Backend whose TTLs follow wall-clock time.
    pub fn new() -> Self {
        MemoryKvBackend::with_clock(Arc::new(SystemClock))
    }

    /// Backend whose TTLs follow the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        MemoryKvBackend {
            clock,
            buckets: DashMap::new(),
        }
    }

    /// Names of every bucket created so far.
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.buckets.iter().map(|b| b.key().clone()).collect();
        names.sort();
        names
    }

    /// Typed handle to a bucket, for test-only hooks like `poison_delete`.
    pub fn raw_bucket(&self, name: &str) -> Option<Arc<MemoryKvBucket>> {
        self.buckets.get(name).map(|b| Arc::clone(b.value()))
    }
}

impl Default for MemoryKvBackend {
    fn default() -> Self {
        MemoryKvBackend::new()
    }
}

#[async_trait]
impl KvBackend for MemoryKvBackend {
    async fn create_bucket(&self, name: &str) -> Result<Arc<dyn KvBucket>, CairnError> {
        let bucket = self
            .buckets
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryKvBucket::new(name, self.clock.clone())))
            .clone();
        Ok(bucket)
    }

    async fn open_bucket(&self, name: &str) -> Result<Option<Arc<dyn KvBucket>>, CairnError> {
        Ok(self
            .buckets
            .get(name)
            .map(|bucket| Arc::clone(bucket.value()) as Arc<dyn KvBucket>))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use std::time::Duration;

    #[tokio::test]
    async fn create_bucket_is_idempotent() {
        let backend = MemoryKvBackend::new();
        let first = backend.create_bucket("b1").await.unwrap();
        first.put("k", b"v", None).await.unwrap();

        // Re-creating must return the same bucket, data intact.
        let second = backend.create_bucket("b1").await.unwrap();
        assert_eq!(second.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(backend.bucket_names(), vec!["b1".to_string()]);
    }

    #[tokio::test]
    async fn open_bucket_returns_none_for_unknown() {
        let backend = MemoryKvBackend::new();
        assert!(backend.open_bucket("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_put_delete_cycle() {
        let backend = MemoryKvBackend::new();
        let bucket = backend.create_bucket("b").await.unwrap();

        assert_eq!(bucket.get("k").await.unwrap(), None);
        bucket.put("k", b"v1", None).await.unwrap();
        assert_eq!(bucket.get("k").await.unwrap(), Some(b"v1".to_vec()));

        // Overwrite wins.
        bucket.put("k", b"v2", None).await.unwrap();
        assert_eq!(bucket.get("k").await.unwrap(), Some(b"v2".to_vec()));

        assert!(bucket.delete("k").await.unwrap());
        assert!(!bucket.delete("k").await.unwrap());
        assert_eq!(bucket.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_prefix_scoped_and_sorted() {
        let backend = MemoryKvBackend::new();
        let bucket = backend.create_bucket("b").await.unwrap();

        bucket.put("agents/a/core/2", b"2", None).await.unwrap();
        bucket.put("agents/a/core/1", b"1", None).await.unwrap();
        bucket.put("agents/b/core/3", b"3", None).await.unwrap();
        bucket.put("shared/decisions/4", b"4", None).await.unwrap();

        let entries = bucket.list("agents/a/").await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["agents/a/core/1", "agents/a/core/2"]);

        let all = bucket.list("").await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn ttl_hides_entries_once_clock_passes() {
        let clock = Arc::new(ManualClock::new("2026-01-01T00:00:00Z".parse().unwrap()));
        let backend = MemoryKvBackend::with_clock(clock.clone());
        let bucket = backend.create_bucket("b").await.unwrap();

        bucket
            .put("k", b"v", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(bucket.get("k").await.unwrap().is_some());
        assert_eq!(bucket.list("").await.unwrap().len(), 1);

        clock.advance(Duration::from_secs(61));
        assert!(bucket.get("k").await.unwrap().is_none());
        assert!(bucket.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn poisoned_delete_fails_with_backend_error() {
        let backend = MemoryKvBackend::new();
        let bucket = backend.create_bucket("b").await.unwrap();
        bucket.put("keep/1", b"x", None).await.unwrap();
        bucket.put("bad/2", b"x", None).await.unwrap();

        let raw = backend.raw_bucket("b").unwrap();
        raw.poison_delete("bad/").await;

        assert!(matches!(
            bucket.delete("bad/2").await,
            Err(CairnError::Backend { .. })
        ));
        // Other keys still delete fine.
        assert!(bucket.delete("keep/1").await.unwrap());
    }
}
