// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool handlers for agent-facing memory operations.
//!
//! Each handler validates its request before any I/O, routes through
//! [`cairn_store::ScopedStore`], and returns domain errors verbatim so the
//! invoking agent sees the code and message unchanged:
//!
//! - [`remember`](remember::remember) stores a new memory
//! - [`forget`](forget::forget) deletes one, honoring core protection and
//!   shared-memory ownership
//! - [`commit_insight`](insight::commit_insight) promotes a private memory
//!   into a shared category, or records a fresh shared insight
//! - [`core_memory`](core_memory::core_memory) adds to or lists the caller's
//!   protected core set

use cairn_core::AgentIdentity;
use cairn_store::RouteContext;

pub mod core_memory;
pub mod forget;
pub mod insight;
pub mod remember;

pub use core_memory::{core_memory, CoreMemoryRequest, CoreMemoryResponse};
pub use forget::{forget, ForgetRequest};
pub use insight::{commit_insight, CommitInsightRequest};
pub use remember::{remember, RememberRequest};

/// Routing context for a tool call: the caller's project, the identity's
/// agent. Tools never route by an agent id supplied in the request body.
pub(crate) fn route_for(ctx: &RouteContext, identity: &AgentIdentity) -> RouteContext {
    RouteContext {
        project_id: ctx.project_id.clone(),
        agent_id: Some(identity.agent_id().to_string()),
    }
}
