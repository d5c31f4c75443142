// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent identity records, stored in each agent's user bucket.
//!
//! Identity is written by the supervisor that spawns the agent; this module
//! only reads it. A subagent record may land moments after the agent starts
//! asking for it, so absence is retried under the caller's policy before the
//! agent is assumed to be a root.

use tracing::{debug, warn};

use cairn_core::retry::{retry, RetryPolicy};
use cairn_core::types::MemoryScope;
use cairn_core::{AgentIdentity, CairnError};

use crate::router::{BucketRouter, RouteContext};
use crate::scoped::PERSONAL_KEY_PREFIX;

/// Key the supervisor writes an agent's identity record under.
fn identity_key(agent_id: &str) -> String {
    format!("{PERSONAL_KEY_PREFIX}identity/{agent_id}")
}

/// Retryability while waiting for a record another process writes: transient
/// backend failures, but also the record or its bucket not existing yet.
fn retryable_while_absent(err: &CairnError) -> bool {
    matches!(
        err,
        CairnError::Backend { .. }
            | CairnError::NotFound { .. }
            | CairnError::BucketNotInitialized { .. }
    )
}

/// Load `agent_id`'s identity record, falling back to a root identity when
/// no record turns up within the retry budget.
///
/// Decode failures and persistent backend errors still propagate; only a
/// genuinely absent record downgrades to the root default.
pub async fn load_identity(
    router: &BucketRouter,
    agent_id: &str,
    policy: &RetryPolicy,
) -> Result<AgentIdentity, CairnError> {
    let policy = RetryPolicy {
        is_retryable: retryable_while_absent,
        ..*policy
    };
    let ctx = RouteContext::agent(agent_id);
    let key = identity_key(agent_id);

    let ctx_ref = &ctx;
    let key_ref = &key;
    let outcome = retry(&policy, || async move {
        let bucket = router.lookup(MemoryScope::Personal, ctx_ref).await?;
        match bucket.get(key_ref).await? {
            Some(bytes) => {
                serde_json::from_slice::<AgentIdentity>(&bytes).map_err(CairnError::backend)
            }
            None => Err(CairnError::NotFound {
                id: key_ref.clone(),
            }),
        }
    })
    .await;

    match outcome {
        Ok(identity) => {
            debug!(agent_id, subagent = identity.is_subagent(), "loaded identity record");
            Ok(identity)
        }
        Err(CairnError::NotFound { .. } | CairnError::BucketNotInitialized { .. }) => {
            warn!(agent_id, "no identity record; treating agent as root");
            Ok(AgentIdentity::root(agent_id))
        }
        Err(err) => Err(err),
    }
}
