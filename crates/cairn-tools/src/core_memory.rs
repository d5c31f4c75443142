// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The core-memory tool: the agent's protected, identity-defining set.

use serde::{Deserialize, Serialize};

use cairn_core::types::{Memory, MemoryCategory, MemoryMetadata, MemoryScope};
use cairn_core::{key, AgentIdentity, CairnError, Clock};
use cairn_store::{RouteContext, ScopedStore};

use crate::remember::{remember, RememberRequest};
use crate::route_for;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CoreMemoryRequest {
    Add {
        content: String,
        #[serde(default)]
        metadata: Option<MemoryMetadata>,
    },
    List,
}

#[derive(Debug, Clone, Serialize)]
pub enum CoreMemoryResponse {
    Added(Memory),
    Listed(Vec<Memory>),
}

/// Add to or list the caller's private core memories.
///
/// Add is `remember` pinned to private/core, so it inherits validation and
/// the write ceiling. List returns newest first; an agent with no bucket yet
/// simply has an empty list.
pub async fn core_memory(
    store: &ScopedStore,
    clock: &dyn Clock,
    ctx: &RouteContext,
    identity: &AgentIdentity,
    request: CoreMemoryRequest,
) -> Result<CoreMemoryResponse, CairnError> {
    match request {
        CoreMemoryRequest::Add { content, metadata } => {
            let memory = remember(
                store,
                clock,
                ctx,
                identity,
                RememberRequest {
                    content,
                    scope: MemoryScope::Private,
                    category: MemoryCategory::Core,
                    metadata,
                },
            )
            .await?;
            Ok(CoreMemoryResponse::Added(memory))
        }
        CoreMemoryRequest::List => {
            let route = route_for(ctx, identity);
            let prefix = key::agent_category_prefix(identity.agent_id(), MemoryCategory::Core);
            let mut memories =
                match store.list(&prefix, MemoryScope::Private, &route).await {
                    Ok(memories) => memories,
                    Err(CairnError::BucketNotInitialized { .. }) => Vec::new(),
                    Err(err) => return Err(err),
                };
            memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(CoreMemoryResponse::Listed(memories))
        }
    }
}
