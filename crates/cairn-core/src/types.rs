// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types: scopes, categories, records, and validation.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CairnError;
use crate::limits;

/// Visibility scope of a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryScope {
    /// Visible to one agent within one project.
    Private,
    /// Visible to one agent across all projects.
    Personal,
    /// Visible to all agents within one project.
    Team,
    /// Visible everywhere.
    Public,
}

impl MemoryScope {
    /// All scopes, in recall's default fetch order.
    pub const ALL: [MemoryScope; 4] = [
        MemoryScope::Private,
        MemoryScope::Personal,
        MemoryScope::Team,
        MemoryScope::Public,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryScope::Private => "private",
            MemoryScope::Personal => "personal",
            MemoryScope::Team => "team",
            MemoryScope::Public => "public",
        }
    }

    /// Key-shape and category class this scope belongs to.
    pub fn class(&self) -> ScopeClass {
        match self {
            MemoryScope::Private | MemoryScope::Personal => ScopeClass::Individual,
            MemoryScope::Team | MemoryScope::Public => ScopeClass::Shared,
        }
    }
}

impl fmt::Display for MemoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryScope {
    type Err = CairnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(MemoryScope::Private),
            "personal" => Ok(MemoryScope::Personal),
            "team" => Ok(MemoryScope::Team),
            "public" => Ok(MemoryScope::Public),
            other => Err(CairnError::Validation(format!("unknown scope: {other}"))),
        }
    }
}

/// Class shared by a scope and the categories it may store.
///
/// Individual-class keys live under `agents/{agentId}/`; shared-class keys
/// live under `shared/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeClass {
    Individual,
    Shared,
}

/// Semantic category of a memory, governing TTL, protection, and recall rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryCategory {
    /// Short-lived working context; expires after 24 hours.
    Recent,
    /// Short-lived task state; expires after 24 hours.
    Tasks,
    /// Durable per-agent knowledge.
    Longterm,
    /// Identity-defining facts; protected and write-capped.
    Core,
    /// Shared: recorded decisions.
    Decisions,
    /// Shared: architecture notes.
    Architecture,
    /// Shared: lessons learned.
    Learnings,
}

impl MemoryCategory {
    pub const ALL: [MemoryCategory; 7] = [
        MemoryCategory::Recent,
        MemoryCategory::Tasks,
        MemoryCategory::Longterm,
        MemoryCategory::Core,
        MemoryCategory::Decisions,
        MemoryCategory::Architecture,
        MemoryCategory::Learnings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryCategory::Recent => "recent",
            MemoryCategory::Tasks => "tasks",
            MemoryCategory::Longterm => "longterm",
            MemoryCategory::Core => "core",
            MemoryCategory::Decisions => "decisions",
            MemoryCategory::Architecture => "architecture",
            MemoryCategory::Learnings => "learnings",
        }
    }

    /// Scope class this category may be stored under.
    pub fn class(&self) -> ScopeClass {
        match self {
            MemoryCategory::Recent
            | MemoryCategory::Tasks
            | MemoryCategory::Longterm
            | MemoryCategory::Core => ScopeClass::Individual,
            MemoryCategory::Decisions
            | MemoryCategory::Architecture
            | MemoryCategory::Learnings => ScopeClass::Shared,
        }
    }

    /// Store-enforced TTL, for the categories that expire.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            MemoryCategory::Recent | MemoryCategory::Tasks => Some(limits::SHORT_LIVED_TTL),
            _ => None,
        }
    }

    /// Recall sort rank; lower ranks sort first.
    pub fn rank(&self) -> u8 {
        match self {
            MemoryCategory::Core => 1,
            MemoryCategory::Longterm => 2,
            MemoryCategory::Decisions
            | MemoryCategory::Architecture
            | MemoryCategory::Learnings => 3,
            MemoryCategory::Recent => 4,
            MemoryCategory::Tasks => 5,
        }
    }
}

impl fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryCategory {
    type Err = CairnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(MemoryCategory::Recent),
            "tasks" => Ok(MemoryCategory::Tasks),
            "longterm" => Ok(MemoryCategory::Longterm),
            "core" => Ok(MemoryCategory::Core),
            "decisions" => Ok(MemoryCategory::Decisions),
            "architecture" => Ok(MemoryCategory::Architecture),
            "learnings" => Ok(MemoryCategory::Learnings),
            other => Err(CairnError::Validation(format!("unknown category: {other}"))),
        }
    }
}

/// A single scoped memory record.
///
/// The scope is stored in-band because a storage key alone cannot
/// distinguish team from public (or private from personal) entries; only the
/// bucket a key was read from carries that information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    /// Agent that owns (authored) this memory.
    pub agent_id: String,
    /// Project the memory was created in.
    pub project_id: String,
    pub scope: MemoryScope,
    pub category: MemoryCategory,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MemoryMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set iff the category carries a TTL; mirrors the TTL handed to the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub version: u32,
}

impl Memory {
    /// Build a new memory stamped at `now`.
    ///
    /// `expires_at` is derived from the category here so it can never drift
    /// from the TTL the store is told about.
    pub fn new(
        agent_id: impl Into<String>,
        project_id: impl Into<String>,
        scope: MemoryScope,
        category: MemoryCategory,
        content: impl Into<String>,
        metadata: Option<MemoryMetadata>,
        now: DateTime<Utc>,
    ) -> Self {
        Memory {
            id: Uuid::new_v4(),
            agent_id: agent_id.into(),
            project_id: project_id.into(),
            scope,
            category,
            content: content.into(),
            metadata,
            created_at: now,
            updated_at: now,
            expires_at: category.ttl().map(|ttl| now + ttl),
            version: 1,
        }
    }

    /// Whether the memory's expiry deadline has been reached at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Effective priority; memories without one count as priority 2.
    pub fn priority(&self) -> u8 {
        self.metadata
            .as_ref()
            .and_then(|m| m.priority)
            .unwrap_or(limits::DEFAULT_PRIORITY)
    }

    pub fn tags(&self) -> &[String] {
        self.metadata.as_ref().map_or(&[], |m| m.tags.as_slice())
    }
}

/// Optional caller-supplied metadata attached to a memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryMetadata {
    /// Free-form labels; at most 10, each at most 50 characters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// 1 (highest) through 3.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Ids of related memories.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_to: Vec<Uuid>,
    /// Free-form provenance note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Check that a category may be stored under a scope.
pub fn validate_pairing(scope: MemoryScope, category: MemoryCategory) -> Result<(), CairnError> {
    if scope.class() == category.class() {
        Ok(())
    } else {
        Err(CairnError::InvalidCategory { scope, category })
    }
}

/// Check content against the byte cap.
pub fn validate_content(content: &str) -> Result<(), CairnError> {
    if content.is_empty() {
        return Err(CairnError::Validation("content must not be empty".into()));
    }
    if content.len() > limits::MAX_CONTENT_BYTES {
        return Err(CairnError::Validation(format!(
            "content is {} bytes; maximum is {} bytes",
            content.len(),
            limits::MAX_CONTENT_BYTES
        )));
    }
    Ok(())
}

/// Check tag count/length and priority bounds.
pub fn validate_metadata(metadata: &MemoryMetadata) -> Result<(), CairnError> {
    if metadata.tags.len() > limits::MAX_TAGS {
        return Err(CairnError::Validation(format!(
            "too many tags: {} (maximum is {})",
            metadata.tags.len(),
            limits::MAX_TAGS
        )));
    }
    for tag in &metadata.tags {
        let chars = tag.chars().count();
        if chars > limits::MAX_TAG_CHARS {
            return Err(CairnError::Validation(format!(
                "tag '{tag}' is {chars} characters; maximum is {}",
                limits::MAX_TAG_CHARS
            )));
        }
    }
    if let Some(priority) = metadata.priority {
        if !(limits::MIN_PRIORITY..=limits::MAX_PRIORITY).contains(&priority) {
            return Err(CairnError::Validation(format!(
                "priority {priority} out of range [{}, {}]",
                limits::MIN_PRIORITY,
                limits::MAX_PRIORITY
            )));
        }
    }
    Ok(())
}

/// Validate a whole memory record before any I/O.
pub fn validate_memory(memory: &Memory) -> Result<(), CairnError> {
    if memory.agent_id.is_empty() {
        return Err(CairnError::Validation("agent_id must not be empty".into()));
    }
    if memory.project_id.is_empty() {
        return Err(CairnError::Validation("project_id must not be empty".into()));
    }
    validate_pairing(memory.scope, memory.category)?;
    validate_content(&memory.content)?;
    if let Some(metadata) = &memory.metadata {
        validate_metadata(metadata)?;
    }
    Ok(())
}
