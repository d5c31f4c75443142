// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The forget tool: delete one memory.

use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use cairn_core::types::{MemoryCategory, MemoryScope, ScopeClass};
use cairn_core::{key, AgentIdentity, CairnError};
use cairn_store::{RouteContext, ScopedStore};

use crate::route_for;

#[derive(Debug, Clone, Deserialize)]
pub struct ForgetRequest {
    pub memory_id: Uuid,
    pub scope: MemoryScope,
    /// Required to delete a core memory.
    #[serde(default, rename = "override")]
    pub override_core: bool,
}

/// Delete one memory by id, returning its original category.
///
/// Core memories require `override`; shared memories can only be deleted by
/// the agent that authored them.
pub async fn forget(
    store: &ScopedStore,
    ctx: &RouteContext,
    identity: &AgentIdentity,
    request: ForgetRequest,
) -> Result<MemoryCategory, CairnError> {
    let route = route_for(ctx, identity);
    let prefix = match request.scope.class() {
        ScopeClass::Individual => key::agent_prefix(identity.agent_id()),
        ScopeClass::Shared => key::shared_prefix(),
    };
    let memories = store.list(&prefix, request.scope, &route).await?;
    let memory = memories
        .into_iter()
        .find(|m| m.id == request.memory_id)
        .ok_or_else(|| CairnError::NotFound {
            id: request.memory_id.to_string(),
        })?;

    if request.scope.class() == ScopeClass::Shared && memory.agent_id != identity.agent_id() {
        return Err(CairnError::AccessDenied(format!(
            "memory {} was authored by {}",
            memory.id, memory.agent_id
        )));
    }
    if memory.category == MemoryCategory::Core && !request.override_core {
        return Err(CairnError::CoreProtected {
            id: memory.id.to_string(),
        });
    }

    let removed = store
        .delete(&key::for_memory(&memory), request.scope, &route)
        .await?;
    if !removed {
        return Err(CairnError::NotFound {
            id: request.memory_id.to_string(),
        });
    }
    debug!(
        memory_id = %memory.id,
        category = %memory.category,
        "memory forgotten"
    );
    Ok(memory.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cairn_config::model::StoreConfig;
    use cairn_core::types::Memory;
    use cairn_test_utils::{MemoryBuilder, MemoryKvBackend};

    fn store() -> ScopedStore {
        ScopedStore::new(Arc::new(MemoryKvBackend::new()), StoreConfig::default())
    }

    async fn seed(store: &ScopedStore, memory: &Memory) {
        let route = RouteContext::new("proj-1", memory.agent_id.clone());
        store
            .set(&key::for_memory(memory), memory, memory.scope, &route, None)
            .await
            .unwrap();
    }

    fn forget_request(memory: &Memory, override_core: bool) -> ForgetRequest {
        ForgetRequest {
            memory_id: memory.id,
            scope: memory.scope,
            override_core,
        }
    }

    #[tokio::test]
    async fn deletes_own_memory_and_returns_category() {
        let store = store();
        let ctx = RouteContext::project("proj-1");
        let identity = AgentIdentity::root("agent-1");
        let memory = MemoryBuilder::new(MemoryScope::Private, MemoryCategory::Longterm).build();
        seed(&store, &memory).await;

        let category = forget(&store, &ctx, &identity, forget_request(&memory, false))
            .await
            .unwrap();

        assert_eq!(category, MemoryCategory::Longterm);
        assert!(store
            .get(&key::for_memory(&memory), MemoryScope::Private, &ctx)
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn request_decodes_with_override_key() {
        let request: ForgetRequest = serde_json::from_value(serde_json::json!({
            "memory_id": "a9f0a3de-7a58-4f2c-9e37-5b1c9d3f2a10",
            "scope": "private",
            "override": true,
        }))
        .unwrap();
        assert!(request.override_core);
        assert_eq!(request.scope, MemoryScope::Private);

        // The flag defaults to off when the key is absent.
        let request: ForgetRequest = serde_json::from_value(serde_json::json!({
            "memory_id": "a9f0a3de-7a58-4f2c-9e37-5b1c9d3f2a10",
            "scope": "team",
        }))
        .unwrap();
        assert!(!request.override_core);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = store();
        let ctx = RouteContext::project("proj-1");
        let identity = AgentIdentity::root("agent-1");
        let seeded = MemoryBuilder::new(MemoryScope::Private, MemoryCategory::Longterm).build();
        seed(&store, &seeded).await;

        let request = ForgetRequest {
            memory_id: Uuid::new_v4(),
            scope: MemoryScope::Private,
            override_core: false,
        };
        let result = forget(&store, &ctx, &identity, request).await;

        assert!(matches!(result, Err(CairnError::NotFound { .. })));
    }

    #[tokio::test]
    async fn core_requires_the_override_flag() {
        let store = store();
        let ctx = RouteContext::project("proj-1");
        let identity = AgentIdentity::root("agent-1");
        let core = MemoryBuilder::new(MemoryScope::Private, MemoryCategory::Core).build();
        seed(&store, &core).await;

        let refused = forget(&store, &ctx, &identity, forget_request(&core, false)).await;
        assert!(matches!(refused, Err(CairnError::CoreProtected { .. })));

        let category = forget(&store, &ctx, &identity, forget_request(&core, true))
            .await
            .unwrap();
        assert_eq!(category, MemoryCategory::Core);
    }

    #[tokio::test]
    async fn shared_memory_of_another_author_is_denied() {
        let store = store();
        let ctx = RouteContext::project("proj-1");
        let decision = MemoryBuilder::new(MemoryScope::Team, MemoryCategory::Decisions)
            .agent("agent-author")
            .build();
        seed(&store, &decision).await;

        let caller = AgentIdentity::root("agent-other");
        let result = forget(&store, &ctx, &caller, forget_request(&decision, false)).await;
        assert!(matches!(result, Err(CairnError::AccessDenied(_))));

        // The author can delete it.
        let author = AgentIdentity::root("agent-author");
        let category = forget(&store, &ctx, &author, forget_request(&decision, false))
            .await
            .unwrap();
        assert_eq!(category, MemoryCategory::Decisions);
    }
}
