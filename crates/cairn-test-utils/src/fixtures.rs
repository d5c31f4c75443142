// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent builder for `Memory` fixtures.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cairn_core::types::{Memory, MemoryCategory, MemoryMetadata, MemoryScope};

/// Builder for [`Memory`] test fixtures.
///
/// Defaults to a record owned by `agent-1` in `proj-1`, created "now". Like
/// `Memory::new`, the builder derives `expires_at` from the category's TTL,
/// so fixtures with a backdated `created_at` expire on the same schedule the
/// production path would give them.
#[derive(Debug, Clone)]
pub struct MemoryBuilder {
    id: Option<Uuid>,
    agent_id: String,
    project_id: String,
    scope: MemoryScope,
    category: MemoryCategory,
    content: String,
    metadata: Option<MemoryMetadata>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    version: u32,
}

impl MemoryBuilder {
    pub fn new(scope: MemoryScope, category: MemoryCategory) -> Self {
        MemoryBuilder {
            id: None,
            agent_id: "agent-1".to_string(),
            project_id: "proj-1".to_string(),
            scope,
            category,
            content: "the build uses mold as the linker".to_string(),
            metadata: None,
            created_at: Utc::now(),
            updated_at: None,
            version: 1,
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn metadata(mut self, metadata: MemoryMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.get_or_insert_with(MemoryMetadata::default).tags =
            tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.metadata
            .get_or_insert_with(MemoryMetadata::default)
            .priority = Some(priority);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn build(self) -> Memory {
        Memory {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            agent_id: self.agent_id,
            project_id: self.project_id,
            scope: self.scope,
            category: self.category,
            content: self.content,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
            expires_at: self.category.ttl().map(|ttl| self.created_at + ttl),
            version: self.version,
        }
    }
}
