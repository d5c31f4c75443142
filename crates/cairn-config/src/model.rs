// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the cairn memory store.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! Only deployment-facing knobs live here: how physical buckets are named
//! and how persistently the identity loader retries. Retention policy (TTLs,
//! ceilings, byte caps) is fixed in `cairn_core::limits` and is deliberately
//! not configurable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cairn_core::RetryPolicy;

/// Top-level cairn configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CairnConfig {
    /// Bucket naming for the scope-to-bucket router.
    #[serde(default)]
    pub store: StoreConfig,

    /// Identity-loading retry settings.
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Bucket naming configuration.
///
/// The router derives physical bucket names from these: project buckets as
/// `{project_bucket_prefix}{project_id}`, user buckets as
/// `{user_bucket_prefix}{agent_id}`, and a single global bucket.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Prefix for per-project buckets (private and team scopes).
    #[serde(default = "default_project_bucket_prefix")]
    pub project_bucket_prefix: String,

    /// Prefix for per-agent buckets (personal scope).
    #[serde(default = "default_user_bucket_prefix")]
    pub user_bucket_prefix: String,

    /// Name of the single global bucket (public scope).
    #[serde(default = "default_global_bucket")]
    pub global_bucket: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_bucket_prefix: default_project_bucket_prefix(),
            user_bucket_prefix: default_user_bucket_prefix(),
            global_bucket: default_global_bucket(),
        }
    }
}

fn default_project_bucket_prefix() -> String {
    "cairn-project-".to_string()
}

fn default_user_bucket_prefix() -> String {
    "cairn-user-".to_string()
}

fn default_global_bucket() -> String {
    "cairn-global".to_string()
}

/// Retry settings for reading externally written identity records.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Total read attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff before the second attempt, in milliseconds; doubles per retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl IdentityConfig {
    /// Retry policy carrying these settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    100
}
