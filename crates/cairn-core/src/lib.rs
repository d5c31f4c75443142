// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the cairn scoped memory store.
//!
//! This crate provides the foundational pieces shared across the cairn
//! workspace: the error taxonomy, memory domain types and validation, the
//! storage key codec, caller identity, retry policy, the time source, and
//! the traits the external keyed store must satisfy.

pub mod clock;
pub mod error;
pub mod identity;
pub mod key;
pub mod limits;
pub mod retry;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, SystemClock};
pub use error::CairnError;
pub use identity::AgentIdentity;
pub use retry::RetryPolicy;
pub use traits::{KvBackend, KvBucket, KvEntry};
pub use types::{Memory, MemoryCategory, MemoryMetadata, MemoryScope, ScopeClass};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cairn_error_has_all_variants() {
        // Verify all 9 error variants exist and can be constructed.
        let _validation = CairnError::Validation("test".into());
        let _category = CairnError::InvalidCategory {
            scope: MemoryScope::Private,
            category: MemoryCategory::Decisions,
        };
        let _not_found = CairnError::NotFound { id: "test".into() };
        let _denied = CairnError::AccessDenied("test".into());
        let _protected = CairnError::CoreProtected { id: "test".into() };
        let _full = CairnError::StorageFull {
            agent_id: "test".into(),
            limit: 100,
        };
        let _bucket = CairnError::BucketNotInitialized {
            bucket: "test".into(),
        };
        let _key = CairnError::KeyFormat {
            key: "test".into(),
            reason: "test".into(),
        };
        let _backend = CairnError::backend(std::io::Error::other("test"));
    }

    #[test]
    fn error_codes_are_stable() {
        // Tool callers receive these codes verbatim; renaming one is a
        // breaking change.
        assert_eq!(CairnError::Validation("x".into()).code(), "validation_error");
        assert_eq!(
            CairnError::CoreProtected { id: "x".into() }.code(),
            "core_protected"
        );
        assert_eq!(
            CairnError::backend(std::io::Error::other("x")).code(),
            "backend_error"
        );
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CairnError>();
    }

    #[test]
    fn kv_traits_are_object_safe() {
        // The router hands out Arc<dyn KvBucket>; both traits must stay
        // object safe.
        fn _bucket(_: std::sync::Arc<dyn KvBucket>) {}
        fn _backend(_: std::sync::Arc<dyn KvBackend>) {}
    }
}
