// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contract required of the external keyed store.
//!
//! cairn never implements storage itself. It assumes per-key atomicity and
//! prefix listing from whatever sits behind these traits, and layers scoping,
//! recall, and lifecycle policy on top.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CairnError;

/// One key/value entry returned from a prefix listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub key: String,
    pub value: Vec<u8>,
}

/// Handle to one bucket of the external keyed store.
#[async_trait]
pub trait KvBucket: Send + Sync {
    /// Name the bucket was provisioned under.
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CairnError>;

    /// Store `value` under `key`. When `ttl` is set the store auto-expires
    /// the entry after that duration.
    async fn put(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CairnError>;

    /// Remove `key`, reporting whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, CairnError>;

    /// All live entries whose keys start with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<KvEntry>, CairnError>;
}

/// Factory surface of the external keyed store.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Create-or-open a bucket. Idempotent: concurrent calls for the same
    /// name converge on the same bucket without error.
    async fn create_bucket(&self, name: &str) -> Result<Arc<dyn KvBucket>, CairnError>;

    /// Open an existing bucket, or `None` when it was never created.
    async fn open_bucket(&self, name: &str) -> Result<Option<Arc<dyn KvBucket>>, CairnError>;
}
