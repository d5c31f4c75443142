// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The recall pipeline: fetch, merge, filter, rank, truncate, summarize.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use cairn_core::types::{MemoryCategory, MemoryScope, ScopeClass};
use cairn_core::{key, AgentIdentity, CairnError, Clock, Memory};
use cairn_store::{RouteContext, ScopedStore};

use crate::types::{RecallRequest, RecallResult};
use crate::{filter, summary};

/// Read-side engine over the scoped store.
///
/// Recall never deletes: expired candidates are counted and dropped from the
/// result, and their eviction is left to the lifecycle manager.
pub struct RecallEngine {
    clock: Arc<dyn Clock>,
}

impl RecallEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        RecallEngine { clock }
    }

    /// Recall memories visible to `identity` under `ctx`.
    ///
    /// Infallible by contract: a scope whose fetch fails is logged and
    /// contributes nothing, and every remaining step is pure computation.
    pub async fn recall(
        &self,
        store: &ScopedStore,
        ctx: &RouteContext,
        request: &RecallRequest,
        identity: &AgentIdentity,
    ) -> RecallResult {
        let route = RouteContext {
            project_id: ctx.project_id.clone(),
            agent_id: Some(identity.agent_id().to_string()),
        };

        let mut scopes: Vec<MemoryScope> = Vec::new();
        for scope in &request.scopes {
            if !scopes.contains(scope) {
                scopes.push(*scope);
            }
        }

        let mut candidates = Vec::new();
        for scope in scopes {
            match fetch_scope(store, scope, &route, identity.agent_id()).await {
                Ok(memories) => {
                    counter!("cairn_recall_fetched_total").increment(memories.len() as u64);
                    candidates.extend(memories);
                }
                Err(err) => {
                    warn!(scope = %scope, error = %err, "scope skipped during recall");
                }
            }

            // A sub-agent also sees its parent's private memories, minus the
            // parent's core set. The exclusion keys off the in-band category
            // and cannot be requested away.
            if scope == MemoryScope::Private {
                if let Some(parent) = identity.parent_agent_id() {
                    match store
                        .list(&key::agent_prefix(parent), MemoryScope::Private, &route)
                        .await
                    {
                        Ok(memories) => {
                            let visible: Vec<_> = memories
                                .into_iter()
                                .filter(|memory| memory.category != MemoryCategory::Core)
                                .collect();
                            counter!("cairn_recall_fetched_total")
                                .increment(visible.len() as u64);
                            candidates.extend(visible);
                        }
                        Err(err) => {
                            warn!(
                                parent,
                                error = %err,
                                "parent scope skipped during recall"
                            );
                        }
                    }
                }
            }
        }

        let now = self.clock.now();
        let (expired, active): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|m| m.is_expired(now));
        if !expired.is_empty() {
            counter!("cairn_recall_expired_total").increment(expired.len() as u64);
        }

        let mut kept = filter::apply(request, active);
        kept.sort_by(|a, b| {
            a.category
                .rank()
                .cmp(&b.category.rank())
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        kept.truncate(request.effective_limit());

        let mut result = RecallResult {
            summary: summary::build_summary(&kept),
            ..RecallResult::default()
        };
        result.counts.expired = expired.len();
        for memory in kept {
            match memory.scope {
                MemoryScope::Private => {
                    result.counts.private += 1;
                    result.private.push(memory);
                }
                MemoryScope::Personal => {
                    result.counts.personal += 1;
                    result.personal.push(memory);
                }
                MemoryScope::Team => {
                    result.counts.team += 1;
                    result.team.push(memory);
                }
                MemoryScope::Public => {
                    result.counts.public += 1;
                    result.public.push(memory);
                }
            }
        }

        debug!(
            returned = result.len(),
            expired = result.counts.expired,
            "recall complete"
        );
        result
    }
}

/// Candidates for one scope: the caller's own subtree for individual scopes,
/// the shared subtree otherwise.
async fn fetch_scope(
    store: &ScopedStore,
    scope: MemoryScope,
    route: &RouteContext,
    agent_id: &str,
) -> Result<Vec<Memory>, CairnError> {
    let prefix = match scope.class() {
        ScopeClass::Individual => key::agent_prefix(agent_id),
        ScopeClass::Shared => key::shared_prefix(),
    };
    store.list(&prefix, scope, route).await
}
