// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller identity.

use serde::{Deserialize, Serialize};

/// Identity of the agent making a call.
///
/// A sub-agent reads its parent's private memories during recall, minus the
/// parent's `core` category. That exclusion is enforced by the recall engine
/// and cannot be requested away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AgentIdentity {
    /// A top-level agent.
    Root { agent_id: String },
    /// An agent spawned by another agent.
    Subagent {
        agent_id: String,
        parent_agent_id: String,
    },
}

impl AgentIdentity {
    pub fn root(agent_id: impl Into<String>) -> Self {
        AgentIdentity::Root {
            agent_id: agent_id.into(),
        }
    }

    pub fn subagent(agent_id: impl Into<String>, parent_agent_id: impl Into<String>) -> Self {
        AgentIdentity::Subagent {
            agent_id: agent_id.into(),
            parent_agent_id: parent_agent_id.into(),
        }
    }

    pub fn agent_id(&self) -> &str {
        match self {
            AgentIdentity::Root { agent_id } => agent_id,
            AgentIdentity::Subagent { agent_id, .. } => agent_id,
        }
    }

    pub fn parent_agent_id(&self) -> Option<&str> {
        match self {
            AgentIdentity::Root { .. } => None,
            AgentIdentity::Subagent {
                parent_agent_id, ..
            } => Some(parent_agent_id),
        }
    }

    pub fn is_subagent(&self) -> bool {
        matches!(self, AgentIdentity::Subagent { .. })
    }
}
