// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-scope recall for cairn memories.
//!
//! [`RecallEngine::recall`] fetches candidates from every requested scope,
//! merges in a sub-agent's view of its parent, drops expired entries, applies
//! the request's filters, ranks by category durability and recency, truncates
//! to the limit, and renders a byte-capped digest.

pub mod engine;
pub mod filter;
pub mod summary;
pub mod types;

pub use engine::RecallEngine;
pub use types::{RecallCounts, RecallRequest, RecallResult};
