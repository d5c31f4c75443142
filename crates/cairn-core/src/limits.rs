// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed limits and retention invariants.
//!
//! These are policy constants, not configuration: changing them changes the
//! contract callers observe (rejected writes, eviction counts, summary size).

use std::time::Duration;

/// Maximum UTF-8 byte length of a memory's content.
pub const MAX_CONTENT_BYTES: usize = 32 * 1024;

/// Maximum number of tags per memory.
pub const MAX_TAGS: usize = 10;

/// Maximum character length of a single tag.
pub const MAX_TAG_CHARS: usize = 50;

/// Highest priority a memory can carry (1 sorts before 3).
pub const MIN_PRIORITY: u8 = 1;

/// Lowest priority a memory can carry.
pub const MAX_PRIORITY: u8 = 3;

/// Priority assumed for memories that carry none.
pub const DEFAULT_PRIORITY: u8 = 2;

/// Store-enforced auto-expiry for `recent` and `tasks` memories.
pub const SHORT_LIVED_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Hard per-agent ceiling on `core` memories, enforced at write time.
pub const CORE_CEILING: usize = 100;

/// Cleanup ceiling for `recent`; overflow evicts oldest-first.
pub const RECENT_CEILING: usize = 1000;

/// Cleanup ceiling for `tasks`; overflow evicts oldest-first.
pub const TASKS_CEILING: usize = 500;

/// Result count when a recall request sets no limit.
pub const RECALL_DEFAULT_LIMIT: usize = 50;

/// Upper clamp on a recall request's limit.
pub const RECALL_MAX_LIMIT: usize = 200;

/// Byte cap on the recall summary text.
pub const SUMMARY_MAX_BYTES: usize = 4096;

/// Smallest content fragment worth emitting when the summary truncates.
pub const SUMMARY_MIN_FRAGMENT_BYTES: usize = 20;
