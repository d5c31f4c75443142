// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The remember tool: store one new memory.

use serde::Deserialize;
use tracing::debug;

use cairn_core::limits::CORE_CEILING;
use cairn_core::types::{validate_memory, Memory, MemoryCategory, MemoryMetadata, MemoryScope};
use cairn_core::{key, AgentIdentity, CairnError, Clock};
use cairn_store::{RouteContext, ScopedStore};

use crate::route_for;

#[derive(Debug, Clone, Deserialize)]
pub struct RememberRequest {
    pub content: String,
    pub scope: MemoryScope,
    pub category: MemoryCategory,
    #[serde(default)]
    pub metadata: Option<MemoryMetadata>,
}

/// Store a new memory for the calling agent.
///
/// Shape, size, and scope/category pairing are validated before any I/O.
/// The TTL handed to the store and the memory's `expires_at` both derive
/// from the category. Writes into `core` are rejected with `StorageFull`
/// once the agent holds [`CORE_CEILING`] core memories.
pub async fn remember(
    store: &ScopedStore,
    clock: &dyn Clock,
    ctx: &RouteContext,
    identity: &AgentIdentity,
    request: RememberRequest,
) -> Result<Memory, CairnError> {
    // Every memory records which project it was made in, even when the
    // scope routes to a user or global bucket.
    let project_id = ctx.require_project()?;
    let memory = Memory::new(
        identity.agent_id(),
        project_id,
        request.scope,
        request.category,
        request.content,
        request.metadata,
        clock.now(),
    );
    validate_memory(&memory)?;

    let route = route_for(ctx, identity);
    if memory.category == MemoryCategory::Core {
        enforce_core_ceiling(store, identity.agent_id(), memory.scope, &route).await?;
    }

    let k = key::for_memory(&memory);
    store
        .set(&k, &memory, memory.scope, &route, memory.category.ttl())
        .await?;
    debug!(
        memory_id = %memory.id,
        scope = %memory.scope,
        category = %memory.category,
        "memory stored"
    );
    Ok(memory)
}

/// Reject the write when the agent already holds the maximum number of core
/// memories in the target bucket.
async fn enforce_core_ceiling(
    store: &ScopedStore,
    agent_id: &str,
    scope: MemoryScope,
    route: &RouteContext,
) -> Result<(), CairnError> {
    let prefix = key::agent_category_prefix(agent_id, MemoryCategory::Core);
    let count = match store.keys(&prefix, scope, route).await {
        Ok(keys) => keys.len(),
        // First core write may land before the bucket exists.
        Err(CairnError::BucketNotInitialized { .. }) => 0,
        Err(err) => return Err(err),
    };
    if count >= CORE_CEILING {
        return Err(CairnError::StorageFull {
            agent_id: agent_id.to_string(),
            limit: CORE_CEILING,
        });
    }
    Ok(())
}
