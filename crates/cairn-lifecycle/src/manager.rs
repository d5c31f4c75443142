// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-phase cleanup over a project's individual memories.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};

use cairn_core::limits::{CORE_CEILING, RECENT_CEILING, TASKS_CEILING};
use cairn_core::types::{Memory, MemoryCategory, MemoryScope};
use cairn_core::{key, CairnError, Clock};
use cairn_store::{RouteContext, ScopedStore};

use crate::report::CleanupReport;

/// Evicts what recall only hides: expired entries first, then the oldest
/// entries of any short-lived category over its ceiling.
pub struct LifecycleManager {
    clock: Arc<dyn Clock>,
}

impl LifecycleManager {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        LifecycleManager { clock }
    }

    /// Clean one project's individual memories.
    ///
    /// Phase 1 deletes expired entries. Phase 2, skipped under
    /// `expire_only`, prunes recent and tasks down to their ceilings,
    /// oldest first. Core is never auto-deleted; exceeding its ceiling only
    /// produces an error entry. Individual failures are recorded and the
    /// scan keeps going.
    pub async fn run(
        &self,
        store: &ScopedStore,
        project_id: &str,
        expire_only: bool,
    ) -> CleanupReport {
        let ctx = RouteContext::project(project_id);
        let mut report = CleanupReport::default();

        let memories = match store
            .list(&key::agents_prefix(), MemoryScope::Private, &ctx)
            .await
        {
            Ok(memories) => memories,
            Err(CairnError::BucketNotInitialized { .. }) => {
                debug!(project_id, "no project bucket; nothing to clean");
                return report;
            }
            Err(err) => {
                report.errors.push(format!("list {project_id}: {err}"));
                return self.finish(project_id, report);
            }
        };

        let now = self.clock.now();
        let (expired, active): (Vec<_>, Vec<_>) =
            memories.into_iter().partition(|m| m.is_expired(now));

        let mut expired_keys: Vec<String> = expired.iter().map(key::for_memory).collect();
        expired_keys.sort();
        for k in expired_keys {
            match store.delete(&k, MemoryScope::Private, &ctx).await {
                Ok(_) => report.expired += 1,
                Err(err) => report.errors.push(format!("expire {k}: {err}")),
            }
        }

        if expire_only {
            return self.finish(project_id, report);
        }

        for (category, ceiling) in [
            (MemoryCategory::Recent, RECENT_CEILING),
            (MemoryCategory::Tasks, TASKS_CEILING),
        ] {
            let mut entries: Vec<&Memory> =
                active.iter().filter(|m| m.category == category).collect();
            if entries.len() <= ceiling {
                continue;
            }
            entries.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            let excess = entries.len() - ceiling;
            for memory in entries.into_iter().take(excess) {
                let k = key::for_memory(memory);
                match store.delete(&k, MemoryScope::Private, &ctx).await {
                    Ok(_) => report.deleted += 1,
                    Err(err) => report.errors.push(format!("evict {k}: {err}")),
                }
            }
        }

        let core_count = active
            .iter()
            .filter(|m| m.category == MemoryCategory::Core)
            .count();
        if core_count > CORE_CEILING {
            report.errors.push(format!(
                "core holds {core_count} memories, over the ceiling of {CORE_CEILING}; \
                 core is never auto-deleted"
            ));
        }

        self.finish(project_id, report)
    }

    fn finish(&self, project_id: &str, report: CleanupReport) -> CleanupReport {
        counter!("cairn_lifecycle_expired_total").increment(report.expired as u64);
        counter!("cairn_lifecycle_deleted_total").increment(report.deleted as u64);
        counter!("cairn_lifecycle_errors_total").increment(report.errors.len() as u64);
        info!(
            project_id,
            expired = report.expired,
            deleted = report.deleted,
            errors = report.errors.len(),
            "cleanup run complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::{DateTime, TimeDelta, Utc};

    use cairn_config::model::StoreConfig;
    use cairn_test_utils::{ManualClock, MemoryBuilder, MemoryKvBackend};

    fn start() -> DateTime<Utc> {
        "2026-05-01T00:00:00Z".parse().unwrap()
    }

    fn harness() -> (Arc<ManualClock>, Arc<MemoryKvBackend>, LifecycleManager, ScopedStore) {
        let clock = Arc::new(ManualClock::new(start()));
        let backend = Arc::new(MemoryKvBackend::new());
        let manager = LifecycleManager::new(clock.clone());
        let store = ScopedStore::new(backend.clone(), StoreConfig::default());
        (clock, backend, manager, store)
    }

    async fn seed(store: &ScopedStore, memory: &Memory) {
        let route = RouteContext::project("proj-1");
        store
            .set(&key::for_memory(memory), memory, memory.scope, &route, None)
            .await
            .unwrap();
    }

    fn private(category: MemoryCategory, created_at: DateTime<Utc>) -> Memory {
        MemoryBuilder::new(MemoryScope::Private, category)
            .created_at(created_at)
            .build()
    }

    #[tokio::test]
    async fn expired_entries_are_deleted_active_ones_kept() {
        let (clock, _, manager, store) = harness();
        let stale_a = private(MemoryCategory::Tasks, start());
        let stale_b = private(MemoryCategory::Recent, start());
        let keeper = private(MemoryCategory::Longterm, start());
        for memory in [&stale_a, &stale_b, &keeper] {
            seed(&store, memory).await;
        }

        clock.advance(Duration::from_secs(24 * 60 * 60 + 1));
        let report = manager.run(&store, "proj-1", false).await;

        assert_eq!(report.expired, 2);
        assert_eq!(report.deleted, 0);
        assert!(report.is_clean());

        let ctx = RouteContext::project("proj-1");
        let remaining = store
            .list(&key::agents_prefix(), MemoryScope::Private, &ctx)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keeper.id);
    }

    #[tokio::test]
    async fn recent_over_ceiling_loses_exactly_the_oldest() {
        let (_, _, manager, store) = harness();
        let mut seeded = Vec::new();
        for i in 0..1005 {
            let memory = private(
                MemoryCategory::Recent,
                start() + TimeDelta::seconds(i as i64),
            );
            seed(&store, &memory).await;
            seeded.push(memory);
        }

        let report = manager.run(&store, "proj-1", false).await;

        assert_eq!(report.deleted, 5);
        assert_eq!(report.expired, 0);
        assert!(report.is_clean());

        let ctx = RouteContext::project("proj-1");
        let remaining = store
            .list(&key::agents_prefix(), MemoryScope::Private, &ctx)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1000);
        let survivors: Vec<_> = remaining.iter().map(|m| m.id).collect();
        for oldest in &seeded[..5] {
            assert!(!survivors.contains(&oldest.id));
        }
    }

    #[tokio::test]
    async fn equal_timestamps_break_ties_by_id() {
        let (_, _, manager, store) = harness();
        let mut seeded = Vec::new();
        for _ in 0..1001 {
            let memory = private(MemoryCategory::Recent, start());
            seed(&store, &memory).await;
            seeded.push(memory);
        }

        let report = manager.run(&store, "proj-1", false).await;
        assert_eq!(report.deleted, 1);

        let loser = seeded.iter().map(|m| m.id).min().unwrap();
        let ctx = RouteContext::project("proj-1");
        let remaining = store
            .list(&key::agents_prefix(), MemoryScope::Private, &ctx)
            .await
            .unwrap();
        assert!(remaining.iter().all(|m| m.id != loser));
    }

    #[tokio::test]
    async fn core_over_ceiling_is_reported_never_deleted() {
        let (_, _, manager, store) = harness();
        for _ in 0..101 {
            seed(&store, &private(MemoryCategory::Core, start())).await;
        }

        let report = manager.run(&store, "proj-1", false).await;

        assert_eq!(report.deleted, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("101"), "{}", report.errors[0]);

        let ctx = RouteContext::project("proj-1");
        let remaining = store
            .list(&key::agents_prefix(), MemoryScope::Private, &ctx)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 101);
    }

    #[tokio::test]
    async fn expire_only_skips_the_quota_phase() {
        let (clock, _, manager, store) = harness();
        let stale = private(MemoryCategory::Tasks, start());
        seed(&store, &stale).await;

        clock.advance(Duration::from_secs(24 * 60 * 60 + 1));
        let fresh_start = start() + TimeDelta::seconds(24 * 60 * 60 + 1);
        for _ in 0..1002 {
            seed(&store, &private(MemoryCategory::Recent, fresh_start)).await;
        }

        let report = manager.run(&store, "proj-1", true).await;

        assert_eq!(report.expired, 1);
        assert_eq!(report.deleted, 0);

        let ctx = RouteContext::project("proj-1");
        let remaining = store
            .list(&key::agents_prefix(), MemoryScope::Private, &ctx)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1002);
    }

    #[tokio::test]
    async fn delete_failures_degrade_counts_not_the_run() {
        let (clock, backend, manager, store) = harness();
        let stale_a = private(MemoryCategory::Tasks, start());
        let stale_b = private(MemoryCategory::Tasks, start());
        seed(&store, &stale_a).await;
        seed(&store, &stale_b).await;

        let bucket = backend.raw_bucket("cairn-project-proj-1").unwrap();
        bucket.poison_delete(&stale_a.id.to_string()).await;

        clock.advance(Duration::from_secs(24 * 60 * 60 + 1));
        let report = manager.run(&store, "proj-1", false).await;

        assert_eq!(report.expired, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains(&stale_a.id.to_string()));
    }

    #[tokio::test]
    async fn unprovisioned_project_reports_nothing() {
        let (_, _, manager, store) = harness();

        let report = manager.run(&store, "ghost-project", false).await;

        assert_eq!(report, CleanupReport::default());
    }
}
