// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and result shapes for recall.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cairn_core::limits::{MAX_PRIORITY, MIN_PRIORITY, RECALL_DEFAULT_LIMIT, RECALL_MAX_LIMIT};
use cairn_core::types::{Memory, MemoryCategory, MemoryScope};

/// What to recall.
///
/// Every field may be omitted on the wire; absent fields take the defaults
/// documented per field. All present filters apply conjunctively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallRequest {
    /// Scopes to search. Defaults to all four.
    pub scopes: Vec<MemoryScope>,
    /// Category allow-list. Empty means every category.
    pub categories: Vec<MemoryCategory>,
    /// Maximum entries returned across all scopes, clamped to
    /// `[1, RECALL_MAX_LIMIT]`.
    pub limit: usize,
    /// Keep only memories updated at or after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Keep only memories carrying every one of these tags.
    pub tags: Vec<String>,
    /// Inclusive priority floor. Memories without a priority count as 2.
    pub min_priority: u8,
    /// Inclusive priority ceiling.
    pub max_priority: u8,
    /// Keep only memories created strictly after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Keep only memories created strictly before this instant.
    pub created_before: Option<DateTime<Utc>>,
    /// Keep only memories updated strictly after this instant.
    pub updated_after: Option<DateTime<Utc>>,
    /// Keep only memories updated strictly before this instant.
    pub updated_before: Option<DateTime<Utc>>,
    /// Case-insensitive substring match on content.
    pub search: Option<String>,
}

impl Default for RecallRequest {
    fn default() -> Self {
        RecallRequest {
            scopes: MemoryScope::ALL.to_vec(),
            categories: Vec::new(),
            limit: RECALL_DEFAULT_LIMIT,
            since: None,
            tags: Vec::new(),
            min_priority: MIN_PRIORITY,
            max_priority: MAX_PRIORITY,
            created_after: None,
            created_before: None,
            updated_after: None,
            updated_before: None,
            search: None,
        }
    }
}

impl RecallRequest {
    /// The limit actually applied: at least 1, at most [`RECALL_MAX_LIMIT`].
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, RECALL_MAX_LIMIT)
    }
}

/// Entry counts per scope, plus how many candidates were expired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecallCounts {
    pub private: usize,
    pub personal: usize,
    pub team: usize,
    pub public: usize,
    /// Candidates dropped because `expires_at` had passed. Informational;
    /// eviction is the lifecycle manager's job, not recall's.
    pub expired: usize,
}

/// Recalled memories grouped by their in-band scope.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecallResult {
    pub private: Vec<Memory>,
    pub personal: Vec<Memory>,
    pub team: Vec<Memory>,
    pub public: Vec<Memory>,
    pub counts: RecallCounts,
    /// Compact digest of the returned entries, capped at
    /// [`cairn_core::limits::SUMMARY_MAX_BYTES`].
    pub summary: String,
}

impl RecallResult {
    /// Total memories returned across all scopes.
    pub fn len(&self) -> usize {
        self.private.len() + self.personal.len() + self.team.len() + self.public.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_scopes() {
        let request = RecallRequest::default();
        assert_eq!(request.scopes, MemoryScope::ALL.to_vec());
        assert!(request.categories.is_empty());
        assert_eq!(request.limit, 50);
        assert_eq!((request.min_priority, request.max_priority), (1, 3));
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let request: RecallRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.scopes.len(), 4);
        assert_eq!(request.limit, 50);
        assert!(request.search.is_none());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let request: RecallRequest =
            serde_json::from_str(r#"{"scopes": ["team"], "search": "linker"}"#).unwrap();
        assert_eq!(request.scopes, vec![MemoryScope::Team]);
        assert_eq!(request.search.as_deref(), Some("linker"));
        assert_eq!(request.limit, 50);
    }

    #[test]
    fn effective_limit_clamps_both_ends() {
        let mut request = RecallRequest::default();
        assert_eq!(request.effective_limit(), 50);

        request.limit = 0;
        assert_eq!(request.effective_limit(), 1);

        request.limit = 5000;
        assert_eq!(request.effective_limit(), RECALL_MAX_LIMIT);
    }
}
