// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope-to-bucket routing.
//!
//! Every memory operation lands in one of three bucket classes: a per-project
//! bucket (private and team scopes), a per-agent user bucket (personal
//! scope), or the single global bucket (public scope). The router derives the
//! physical bucket name from configuration, validates that the routing
//! context carries the ids the scope needs before any I/O happens, and
//! caches bucket handles.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use cairn_config::model::StoreConfig;
use cairn_core::types::MemoryScope;
use cairn_core::{CairnError, KvBackend, KvBucket};

/// Ids identifying where a call is running.
///
/// Which fields must be present depends on the scope being routed: private
/// and team need `project_id`, personal needs `agent_id`, public needs
/// neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteContext {
    pub project_id: Option<String>,
    pub agent_id: Option<String>,
}

impl RouteContext {
    pub fn new(project_id: impl Into<String>, agent_id: impl Into<String>) -> Self {
        RouteContext {
            project_id: Some(project_id.into()),
            agent_id: Some(agent_id.into()),
        }
    }

    /// Context with only a project id.
    pub fn project(project_id: impl Into<String>) -> Self {
        RouteContext {
            project_id: Some(project_id.into()),
            agent_id: None,
        }
    }

    /// Context with only an agent id.
    pub fn agent(agent_id: impl Into<String>) -> Self {
        RouteContext {
            project_id: None,
            agent_id: Some(agent_id.into()),
        }
    }

    /// The project id, or a `Validation` error when absent or blank.
    pub fn require_project(&self) -> Result<&str, CairnError> {
        self.project_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                CairnError::Validation("routing context is missing a project_id".to_string())
            })
    }

    /// The agent id, or a `Validation` error when absent or blank.
    pub fn require_agent(&self) -> Result<&str, CairnError> {
        self.agent_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                CairnError::Validation("routing context is missing an agent_id".to_string())
            })
    }
}

/// Resolves scopes to bucket handles on the external keyed store.
pub struct BucketRouter {
    backend: Arc<dyn KvBackend>,
    config: StoreConfig,
    /// Handles by physical bucket name; avoids redundant provisioning calls.
    handles: DashMap<String, Arc<dyn KvBucket>>,
}

impl BucketRouter {
    pub fn new(backend: Arc<dyn KvBackend>, config: StoreConfig) -> Self {
        BucketRouter {
            backend,
            config,
            handles: DashMap::new(),
        }
    }

    /// Physical bucket name for a scope.
    ///
    /// Fails with `Validation` before any I/O when the context lacks an id
    /// the scope requires.
    pub fn bucket_name(&self, scope: MemoryScope, ctx: &RouteContext) -> Result<String, CairnError> {
        match scope {
            MemoryScope::Private | MemoryScope::Team => {
                let project_id = ctx.require_project()?;
                Ok(format!("{}{project_id}", self.config.project_bucket_prefix))
            }
            MemoryScope::Personal => {
                let agent_id = ctx.require_agent()?;
                Ok(format!("{}{agent_id}", self.config.user_bucket_prefix))
            }
            MemoryScope::Public => Ok(self.config.global_bucket.clone()),
        }
    }

    /// Resolve a bucket handle, provisioning the bucket on first use.
    ///
    /// Provisioning is idempotent at the store, so a concurrent duplicate
    /// call converges on the same bucket; no lock is held across the await.
    pub async fn resolve(
        &self,
        scope: MemoryScope,
        ctx: &RouteContext,
    ) -> Result<Arc<dyn KvBucket>, CairnError> {
        let name = self.bucket_name(scope, ctx)?;
        if let Some(handle) = self.handles.get(&name) {
            return Ok(Arc::clone(handle.value()));
        }

        let bucket = self.backend.create_bucket(&name).await?;
        debug!(bucket = %name, scope = %scope, "provisioned bucket");
        self.handles.insert(name, Arc::clone(&bucket));
        Ok(bucket)
    }

    /// Resolve without provisioning.
    ///
    /// Fails with `BucketNotInitialized` when the bucket was never created,
    /// so read paths cannot conjure empty buckets into existence.
    pub async fn lookup(
        &self,
        scope: MemoryScope,
        ctx: &RouteContext,
    ) -> Result<Arc<dyn KvBucket>, CairnError> {
        let name = self.bucket_name(scope, ctx)?;
        if let Some(handle) = self.handles.get(&name) {
            return Ok(Arc::clone(handle.value()));
        }

        match self.backend.open_bucket(&name).await? {
            Some(bucket) => {
                self.handles.insert(name, Arc::clone(&bucket));
                Ok(bucket)
            }
            None => Err(CairnError::BucketNotInitialized { bucket: name }),
        }
    }
}
