// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./cairn.toml` > `~/.config/cairn/cairn.toml` >
//! `/etc/cairn/cairn.toml` with environment variable overrides via the
//! `CAIRN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CairnConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cairn/cairn.toml` (system-wide)
/// 3. `~/.config/cairn/cairn.toml` (user XDG config)
/// 4. `./cairn.toml` (local directory)
/// 5. `CAIRN_*` environment variables
pub fn load_config() -> Result<CairnConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env vars).
///
/// Useful for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CairnConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CairnConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CairnConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CairnConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for
/// diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CairnConfig::default()))
        .merge(Toml::file("/etc/cairn/cairn.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cairn/cairn.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cairn.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores themselves: `CAIRN_STORE_GLOBAL_BUCKET` must map to
/// `store.global_bucket`, not `store.global.bucket`.
fn env_provider() -> Env {
    Env::prefixed("CAIRN_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CAIRN_STORE_GLOBAL_BUCKET -> "store_global_bucket"
        let mapped = key
            .as_str()
            .replacen("store_", "store.", 1)
            .replacen("identity_", "identity.", 1);
        mapped.into()
    })
}
