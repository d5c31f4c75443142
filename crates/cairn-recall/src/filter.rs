// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request filters applied to recall candidates.

use cairn_core::types::Memory;

use crate::types::RecallRequest;

/// Whether `memory` passes every filter set on `request`.
///
/// `since` is at-or-after on `updated_at`; the created/updated range bounds
/// are strict. A memory without a priority counts as priority 2.
pub fn matches(request: &RecallRequest, memory: &Memory) -> bool {
    if !request.categories.is_empty() && !request.categories.contains(&memory.category) {
        return false;
    }
    if let Some(since) = request.since {
        if memory.updated_at < since {
            return false;
        }
    }
    if !request
        .tags
        .iter()
        .all(|tag| memory.tags().iter().any(|have| have == tag))
    {
        return false;
    }
    let priority = memory.priority();
    if priority < request.min_priority || priority > request.max_priority {
        return false;
    }
    if let Some(after) = request.created_after {
        if memory.created_at <= after {
            return false;
        }
    }
    if let Some(before) = request.created_before {
        if memory.created_at >= before {
            return false;
        }
    }
    if let Some(after) = request.updated_after {
        if memory.updated_at <= after {
            return false;
        }
    }
    if let Some(before) = request.updated_before {
        if memory.updated_at >= before {
            return false;
        }
    }
    if let Some(search) = &request.search {
        if !memory
            .content
            .to_lowercase()
            .contains(&search.to_lowercase())
        {
            return false;
        }
    }
    true
}

/// Retain the candidates that pass [`matches`].
pub fn apply(request: &RecallRequest, candidates: Vec<Memory>) -> Vec<Memory> {
    candidates
        .into_iter()
        .filter(|memory| matches(request, memory))
        .collect()
}
