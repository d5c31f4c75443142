// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the cairn memory system.

use thiserror::Error;

use crate::types::{MemoryCategory, MemoryScope};

/// The primary error type used across all cairn operations.
#[derive(Debug, Error)]
pub enum CairnError {
    /// Input failed validation; raised before any I/O is attempted.
    #[error("validation error: {0}")]
    Validation(String),

    /// The category's class does not match the scope's class.
    #[error("category '{category}' cannot be stored under scope '{scope}'")]
    InvalidCategory {
        scope: MemoryScope,
        category: MemoryCategory,
    },

    /// No memory exists under the given id.
    #[error("memory not found: {id}")]
    NotFound { id: String },

    /// Caller attempted to modify a shared memory it does not own.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Core memories require an explicit override flag to delete.
    #[error("core memory {id} is protected; pass the override flag to delete it")]
    CoreProtected { id: String },

    /// Per-agent core-memory ceiling reached; the write was rejected.
    #[error("core memory limit reached for agent {agent_id}: {limit} entries max")]
    StorageFull { agent_id: String, limit: usize },

    /// Operation targeted a bucket that was never provisioned.
    #[error("bucket not initialized: {bucket}")]
    BucketNotInitialized { bucket: String },

    /// A storage key did not match either canonical shape.
    #[error("malformed storage key '{key}': {reason}")]
    KeyFormat { key: String, reason: String },

    /// Failure reported by the external keyed store.
    #[error("backend error: {source}")]
    Backend {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CairnError {
    /// Wrap an external-store failure.
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        CairnError::Backend { source: err.into() }
    }

    /// Short machine-readable code, surfaced verbatim to tool callers.
    pub fn code(&self) -> &'static str {
        match self {
            CairnError::Validation(_) => "validation_error",
            CairnError::InvalidCategory { .. } => "invalid_category",
            CairnError::NotFound { .. } => "memory_not_found",
            CairnError::AccessDenied(_) => "access_denied",
            CairnError::CoreProtected { .. } => "core_protected",
            CairnError::StorageFull { .. } => "storage_full",
            CairnError::BucketNotInitialized { .. } => "bucket_not_initialized",
            CairnError::KeyFormat { .. } => "key_format",
            CairnError::Backend { .. } => "backend_error",
        }
    }
}
