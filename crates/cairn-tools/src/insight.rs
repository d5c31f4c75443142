// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The commit-insight tool: publish knowledge into a shared scope.

use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use cairn_core::types::{
    validate_memory, validate_pairing, Memory, MemoryCategory, MemoryScope, ScopeClass,
};
use cairn_core::{key, AgentIdentity, CairnError, Clock};
use cairn_store::{RouteContext, ScopedStore};

use crate::route_for;

/// Either promote an existing private memory (`source_memory_id`) or record
/// fresh `content`; exactly one of the two must be present.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInsightRequest {
    #[serde(default)]
    pub source_memory_id: Option<Uuid>,
    #[serde(default)]
    pub content: Option<String>,
    pub scope: MemoryScope,
    pub category: MemoryCategory,
}

/// Publish an insight into a shared scope, returning the shared memory.
///
/// Promotion re-keys the source under its new scope and category, clears any
/// expiry, and bumps the version; the private original is deleted afterward.
pub async fn commit_insight(
    store: &ScopedStore,
    clock: &dyn Clock,
    ctx: &RouteContext,
    identity: &AgentIdentity,
    request: CommitInsightRequest,
) -> Result<Memory, CairnError> {
    validate_pairing(request.scope, request.category)?;
    if request.scope.class() != ScopeClass::Shared {
        return Err(CairnError::Validation(
            "insights must target a shared scope (team or public)".into(),
        ));
    }

    let route = route_for(ctx, identity);
    match (request.source_memory_id, request.content) {
        (Some(source_id), None) => {
            promote(store, clock, &route, identity, source_id, request.scope, request.category)
                .await
        }
        (None, Some(content)) => {
            let project_id = ctx.require_project()?;
            let memory = Memory::new(
                identity.agent_id(),
                project_id,
                request.scope,
                request.category,
                content,
                None,
                clock.now(),
            );
            validate_memory(&memory)?;

            store
                .set(&key::for_memory(&memory), &memory, request.scope, &route, None)
                .await?;
            debug!(memory_id = %memory.id, category = %memory.category, "insight recorded");
            Ok(memory)
        }
        _ => Err(CairnError::Validation(
            "provide exactly one of source_memory_id or content".into(),
        )),
    }
}

async fn promote(
    store: &ScopedStore,
    clock: &dyn Clock,
    route: &RouteContext,
    identity: &AgentIdentity,
    source_id: Uuid,
    scope: MemoryScope,
    category: MemoryCategory,
) -> Result<Memory, CairnError> {
    let candidates = store
        .list(&key::agent_prefix(identity.agent_id()), MemoryScope::Private, route)
        .await?;
    let mut memory = candidates
        .into_iter()
        .find(|m| m.id == source_id)
        .ok_or_else(|| CairnError::NotFound {
            id: source_id.to_string(),
        })?;

    let old_key = key::for_memory(&memory);
    memory.scope = scope;
    memory.category = category;
    memory.updated_at = clock.now();
    memory.expires_at = None;
    memory.version += 1;

    // Write the shared copy before dropping the private key, so a failure
    // between the two leaves a duplicate rather than a loss.
    let new_key = key::for_memory(&memory);
    store.set(&new_key, &memory, scope, route, None).await?;
    store.delete(&old_key, MemoryScope::Private, route).await?;

    debug!(
        memory_id = %memory.id,
        category = %memory.category,
        version = memory.version,
        "private memory promoted to shared insight"
    );
    Ok(memory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cairn_config::model::StoreConfig;
    use cairn_test_utils::{ManualClock, MemoryBuilder, MemoryKvBackend};

    fn harness() -> (Arc<ManualClock>, ScopedStore) {
        let clock = Arc::new(ManualClock::new("2026-06-01T00:00:00Z".parse().unwrap()));
        let store = ScopedStore::new(Arc::new(MemoryKvBackend::new()), StoreConfig::default());
        (clock, store)
    }

    fn team_request(source: Option<Uuid>, content: Option<&str>) -> CommitInsightRequest {
        CommitInsightRequest {
            source_memory_id: source,
            content: content.map(String::from),
            scope: MemoryScope::Team,
            category: MemoryCategory::Decisions,
        }
    }

    #[tokio::test]
    async fn promotion_rekeys_and_bumps_version() {
        let (clock, store) = harness();
        let ctx = RouteContext::project("proj-1");
        let identity = AgentIdentity::root("agent-1");

        // A tasks memory carries an expiry that promotion must clear.
        let source = MemoryBuilder::new(MemoryScope::Private, MemoryCategory::Tasks).build();
        let route = RouteContext::new("proj-1", "agent-1");
        store
            .set(&key::for_memory(&source), &source, MemoryScope::Private, &route, None)
            .await
            .unwrap();

        let shared = commit_insight(
            &store,
            clock.as_ref(),
            &ctx,
            &identity,
            team_request(Some(source.id), None),
        )
        .await
        .unwrap();

        assert_eq!(shared.id, source.id);
        assert_eq!(shared.scope, MemoryScope::Team);
        assert_eq!(shared.category, MemoryCategory::Decisions);
        assert_eq!(shared.version, source.version + 1);
        assert_eq!(shared.expires_at, None);

        // Old key gone, new key live.
        assert!(store
            .get(&key::for_memory(&source), MemoryScope::Private, &route)
            .await
            .unwrap()
            .is_none());
        let fetched = store
            .get(&key::for_memory(&shared), MemoryScope::Team, &route)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.version, 2);
    }

    #[tokio::test]
    async fn fresh_content_is_recorded_directly() {
        let (clock, store) = harness();
        let ctx = RouteContext::project("proj-1");
        let identity = AgentIdentity::root("agent-1");

        let shared = commit_insight(
            &store,
            clock.as_ref(),
            &ctx,
            &identity,
            team_request(None, Some("we will version the wire format")),
        )
        .await
        .unwrap();

        assert_eq!(shared.version, 1);
        assert_eq!(shared.agent_id, "agent-1");
        assert!(store
            .get(&key::for_memory(&shared), MemoryScope::Team, &ctx)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn exactly_one_input_is_required() {
        let (clock, store) = harness();
        let ctx = RouteContext::project("proj-1");
        let identity = AgentIdentity::root("agent-1");

        let both = commit_insight(
            &store,
            clock.as_ref(),
            &ctx,
            &identity,
            team_request(Some(Uuid::new_v4()), Some("either or")),
        )
        .await;
        assert!(matches!(both, Err(CairnError::Validation(_))));

        let neither =
            commit_insight(&store, clock.as_ref(), &ctx, &identity, team_request(None, None))
                .await;
        assert!(matches!(neither, Err(CairnError::Validation(_))));
    }

    #[tokio::test]
    async fn individual_scopes_are_rejected() {
        let (clock, store) = harness();
        let ctx = RouteContext::project("proj-1");
        let identity = AgentIdentity::root("agent-1");

        // Valid pairing, wrong kind of scope for an insight.
        let mut request = team_request(None, Some("keep this private"));
        request.scope = MemoryScope::Private;
        request.category = MemoryCategory::Longterm;
        let result = commit_insight(&store, clock.as_ref(), &ctx, &identity, request).await;
        assert!(matches!(result, Err(CairnError::Validation(_))));

        // Mismatched pairing fails earlier, as InvalidCategory.
        let mut request = team_request(None, Some("tasks cannot be shared"));
        request.category = MemoryCategory::Tasks;
        let result = commit_insight(&store, clock.as_ref(), &ctx, &identity, request).await;
        assert!(matches!(result, Err(CairnError::InvalidCategory { .. })));
    }

    #[tokio::test]
    async fn missing_source_is_not_found() {
        let (clock, store) = harness();
        let ctx = RouteContext::project("proj-1");
        let identity = AgentIdentity::root("agent-1");
        // Provision the project bucket so the listing itself succeeds.
        store
            .router()
            .resolve(MemoryScope::Private, &ctx)
            .await
            .unwrap();

        let result = commit_insight(
            &store,
            clock.as_ref(),
            &ctx,
            &identity,
            team_request(Some(Uuid::new_v4()), None),
        )
        .await;

        assert!(matches!(result, Err(CairnError::NotFound { .. })));
    }
}
