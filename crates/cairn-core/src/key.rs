// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage key codec.
//!
//! Two canonical shapes, nothing else:
//!
//! - shared class: `shared/{category}/{memoryId}`
//! - individual class: `agents/{agentId}/{category}/{memoryId}`
//!
//! Keys cannot distinguish team from public (or private from personal); that
//! information lives on the entry itself and in the bucket it was read from.

use std::str::FromStr;

use crate::error::CairnError;
use crate::types::{Memory, MemoryCategory, ScopeClass};

/// Leading segment of shared-class keys, and the listing prefix for them.
pub const SHARED_ROOT: &str = "shared";

/// Leading segment of individual-class keys.
pub const AGENTS_ROOT: &str = "agents";

/// A storage key split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    /// Present only for individual-class keys.
    pub agent_id: Option<String>,
    pub category: MemoryCategory,
    pub memory_id: String,
    /// True when the key uses the shared shape.
    pub shared: bool,
}

/// Encode a storage key. Pure and total; pairing rules are enforced upstream
/// by validation, not here.
pub fn encode(agent_id: &str, category: MemoryCategory, memory_id: &str, class: ScopeClass) -> String {
    match class {
        ScopeClass::Shared => format!("{SHARED_ROOT}/{}/{memory_id}", category.as_str()),
        ScopeClass::Individual => {
            format!("{AGENTS_ROOT}/{agent_id}/{}/{memory_id}", category.as_str())
        }
    }
}

/// Listing prefix covering every individual memory in a bucket, all agents.
pub fn agents_prefix() -> String {
    format!("{AGENTS_ROOT}/")
}

/// Listing prefix covering every category of one agent's individual memories.
pub fn agent_prefix(agent_id: &str) -> String {
    format!("{AGENTS_ROOT}/{agent_id}/")
}

/// Listing prefix for one category of one agent's individual memories.
pub fn agent_category_prefix(agent_id: &str, category: MemoryCategory) -> String {
    format!("{AGENTS_ROOT}/{agent_id}/{}/", category.as_str())
}

/// Listing prefix covering all shared memories in a bucket.
pub fn shared_prefix() -> String {
    format!("{SHARED_ROOT}/")
}

/// The key a memory is stored under, derived from its own fields.
pub fn for_memory(memory: &Memory) -> String {
    encode(
        &memory.agent_id,
        memory.category,
        &memory.id.to_string(),
        memory.scope.class(),
    )
}

/// Decode a storage key, rejecting anything outside the two canonical shapes.
pub fn decode(key: &str) -> Result<DecodedKey, CairnError> {
    let segments: Vec<&str> = key.split('/').collect();

    let malformed = |reason: &str| CairnError::KeyFormat {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    match segments.as_slice() {
        [SHARED_ROOT, category, memory_id] => {
            if category.is_empty() || memory_id.is_empty() {
                return Err(malformed("empty segment"));
            }
            let category = MemoryCategory::from_str(category)
                .map_err(|_| malformed(&format!("unknown category '{category}'")))?;
            Ok(DecodedKey {
                agent_id: None,
                category,
                memory_id: (*memory_id).to_string(),
                shared: true,
            })
        }
        [AGENTS_ROOT, agent_id, category, memory_id] => {
            if agent_id.is_empty() || category.is_empty() || memory_id.is_empty() {
                return Err(malformed("empty segment"));
            }
            let category = MemoryCategory::from_str(category)
                .map_err(|_| malformed(&format!("unknown category '{category}'")))?;
            Ok(DecodedKey {
                agent_id: Some((*agent_id).to_string()),
                category,
                memory_id: (*memory_id).to_string(),
                shared: false,
            })
        }
        _ => Err(malformed(
            "expected shared/{category}/{id} or agents/{agentId}/{category}/{id}",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_shared_shape() {
        let key = encode("ignored", MemoryCategory::Decisions, "abc-123", ScopeClass::Shared);
        assert_eq!(key, "shared/decisions/abc-123");
    }

    #[test]
    fn encode_individual_shape() {
        let key = encode("agent-7", MemoryCategory::Core, "abc-123", ScopeClass::Individual);
        assert_eq!(key, "agents/agent-7/core/abc-123");
    }

    #[test]
    fn decode_shared_key() {
        let decoded = decode("shared/learnings/mem-1").unwrap();
        assert_eq!(decoded.agent_id, None);
        assert_eq!(decoded.category, MemoryCategory::Learnings);
        assert_eq!(decoded.memory_id, "mem-1");
        assert!(decoded.shared);
    }

    #[test]
    fn decode_individual_key() {
        let decoded = decode("agents/agent-7/tasks/mem-1").unwrap();
        assert_eq!(decoded.agent_id.as_deref(), Some("agent-7"));
        assert_eq!(decoded.category, MemoryCategory::Tasks);
        assert_eq!(decoded.memory_id, "mem-1");
        assert!(!decoded.shared);
    }

    #[test]
    fn decode_rejects_wrong_segment_counts() {
        for key in [
            "",
            "shared",
            "shared/decisions",
            "shared/decisions/a/b",
            "agents/a/core",
            "agents/a/core/x/y",
            "other/decisions/a",
        ] {
            assert!(
                matches!(decode(key), Err(CairnError::KeyFormat { .. })),
                "must reject {key:?}"
            );
        }
    }

    #[test]
    fn decode_rejects_empty_segments() {
        for key in ["shared//a", "shared/decisions/", "agents//core/a", "agents/a//b"] {
            assert!(
                matches!(decode(key), Err(CairnError::KeyFormat { .. })),
                "must reject {key:?}"
            );
        }
    }

    #[test]
    fn decode_rejects_unknown_category() {
        let err = decode("agents/a/scratch/m").unwrap_err();
        assert!(err.to_string().contains("scratch"));
    }

    #[test]
    fn for_memory_follows_scope_class() {
        use crate::types::{Memory, MemoryScope};
        use chrono::Utc;

        let private = Memory::new(
            "agent-7",
            "proj-1",
            MemoryScope::Private,
            MemoryCategory::Core,
            "c",
            None,
            Utc::now(),
        );
        assert_eq!(
            for_memory(&private),
            format!("agents/agent-7/core/{}", private.id)
        );

        let team = Memory::new(
            "agent-7",
            "proj-1",
            MemoryScope::Team,
            MemoryCategory::Decisions,
            "c",
            None,
            Utc::now(),
        );
        assert_eq!(for_memory(&team), format!("shared/decisions/{}", team.id));
    }

    proptest! {
        #[test]
        fn round_trip(
            agent_id in "[A-Za-z0-9._-]{1,40}",
            memory_id in "[A-Za-z0-9-]{1,36}",
            category in prop::sample::select(MemoryCategory::ALL.to_vec()),
            shared in any::<bool>(),
        ) {
            let class = if shared { ScopeClass::Shared } else { ScopeClass::Individual };
            let key = encode(&agent_id, category, &memory_id, class);
            let decoded = decode(&key).unwrap();

            prop_assert_eq!(decoded.category, category);
            prop_assert_eq!(decoded.memory_id, memory_id.clone());
            prop_assert_eq!(decoded.shared, shared);
            if shared {
                prop_assert_eq!(decoded.agent_id, None);
            } else {
                prop_assert_eq!(decoded.agent_id, Some(agent_id.clone()));
            }
        }
    }
}
