// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped store facade over bucket routing and the external keyed store.
//!
//! All reads and writes of memories go through here: the facade routes the
//! scope to a bucket, serializes `Memory` values as JSON, and applies the
//! user-bucket key prefix for personal-scope entries.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::warn;

use cairn_config::model::StoreConfig;
use cairn_core::types::{Memory, MemoryScope};
use cairn_core::{CairnError, KvBackend};

use crate::router::{BucketRouter, RouteContext};

/// Prefix applied to every memory key in a user bucket.
///
/// Personal-scope entries live under `pattern.agents/...`; the prefix is
/// applied here, never by the key codec, and is stripped before keys are
/// handed back to callers.
pub const PERSONAL_KEY_PREFIX: &str = "pattern.";

/// Scope-routed storage facade for memories.
pub struct ScopedStore {
    router: BucketRouter,
}

impl ScopedStore {
    pub fn new(backend: Arc<dyn KvBackend>, config: StoreConfig) -> Self {
        ScopedStore {
            router: BucketRouter::new(backend, config),
        }
    }

    /// The underlying router, for callers that need raw bucket access.
    pub fn router(&self) -> &BucketRouter {
        &self.router
    }

    /// Fetch one memory. `Ok(None)` when the key holds nothing live.
    pub async fn get(
        &self,
        key: &str,
        scope: MemoryScope,
        ctx: &RouteContext,
    ) -> Result<Option<Memory>, CairnError> {
        let bucket = self.router.lookup(scope, ctx).await?;
        match bucket.get(&physical_key(scope, key)).await? {
            Some(bytes) => {
                let memory = serde_json::from_slice(&bytes).map_err(CairnError::backend)?;
                Ok(Some(memory))
            }
            None => Ok(None),
        }
    }

    /// Store one memory, provisioning the bucket on first write.
    ///
    /// When `ttl` is set the external store auto-expires the entry; the
    /// memory's own `expires_at` must already agree with it.
    pub async fn set(
        &self,
        key: &str,
        memory: &Memory,
        scope: MemoryScope,
        ctx: &RouteContext,
        ttl: Option<Duration>,
    ) -> Result<(), CairnError> {
        let bucket = self.router.resolve(scope, ctx).await?;
        let bytes = serde_json::to_vec(memory).map_err(CairnError::backend)?;
        bucket.put(&physical_key(scope, key), &bytes, ttl).await
    }

    /// Remove one memory, reporting whether it existed.
    pub async fn delete(
        &self,
        key: &str,
        scope: MemoryScope,
        ctx: &RouteContext,
    ) -> Result<bool, CairnError> {
        let bucket = self.router.lookup(scope, ctx).await?;
        bucket.delete(&physical_key(scope, key)).await
    }

    /// All memories under `prefix`, in key order.
    ///
    /// Entries that fail to decode are logged and skipped; one corrupt
    /// record must not hide the rest of a listing.
    pub async fn list(
        &self,
        prefix: &str,
        scope: MemoryScope,
        ctx: &RouteContext,
    ) -> Result<Vec<Memory>, CairnError> {
        let bucket = self.router.lookup(scope, ctx).await?;
        let entries = bucket.list(&physical_key(scope, prefix)).await?;

        let mut memories = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_slice::<Memory>(&entry.value) {
                Ok(memory) => memories.push(memory),
                Err(err) => {
                    counter!("cairn_store_list_decode_failures_total").increment(1);
                    warn!(key = %entry.key, error = %err, "skipping entry that does not decode as a memory");
                }
            }
        }
        Ok(memories)
    }

    /// All keys under `prefix`, with any user-bucket prefix stripped.
    pub async fn keys(
        &self,
        prefix: &str,
        scope: MemoryScope,
        ctx: &RouteContext,
    ) -> Result<Vec<String>, CairnError> {
        let bucket = self.router.lookup(scope, ctx).await?;
        let entries = bucket.list(&physical_key(scope, prefix)).await?;
        Ok(entries
            .into_iter()
            .map(|entry| logical_key(scope, &entry.key))
            .collect())
    }
}

/// Key as stored: personal scope gets the user-bucket prefix.
fn physical_key(scope: MemoryScope, key: &str) -> String {
    match scope {
        MemoryScope::Personal => format!("{PERSONAL_KEY_PREFIX}{key}"),
        _ => key.to_string(),
    }
}

/// Key as callers see it: the user-bucket prefix stripped back off.
fn logical_key(scope: MemoryScope, key: &str) -> String {
    match scope {
        MemoryScope::Personal => key
            .strip_prefix(PERSONAL_KEY_PREFIX)
            .unwrap_or(key)
            .to_string(),
        _ => key.to_string(),
    }
}
