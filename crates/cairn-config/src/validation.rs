// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints serde attributes cannot express, such as
//! bucket-name hygiene and bucket-name collisions between scopes.

use crate::diagnostic::ConfigError;
use crate::model::CairnConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CairnConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    check_bucket_token(
        &config.store.project_bucket_prefix,
        "store.project_bucket_prefix",
        &mut errors,
    );
    check_bucket_token(
        &config.store.user_bucket_prefix,
        "store.user_bucket_prefix",
        &mut errors,
    );
    check_bucket_token(&config.store.global_bucket, "store.global_bucket", &mut errors);

    // The two prefixes must differ, or a project and an agent with the same
    // id would share a physical bucket.
    if config.store.project_bucket_prefix == config.store.user_bucket_prefix {
        errors.push(ConfigError::Validation {
            message: format!(
                "store.project_bucket_prefix and store.user_bucket_prefix are both `{}`; they must differ",
                config.store.project_bucket_prefix
            ),
        });
    }

    // The global bucket must not sit inside either prefixed namespace.
    for (prefix, key) in [
        (&config.store.project_bucket_prefix, "store.project_bucket_prefix"),
        (&config.store.user_bucket_prefix, "store.user_bucket_prefix"),
    ] {
        if !prefix.is_empty() && config.store.global_bucket.starts_with(prefix.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "store.global_bucket `{}` collides with the {key} namespace `{prefix}`",
                    config.store.global_bucket
                ),
            });
        }
    }

    if config.identity.max_attempts < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "identity.max_attempts must be at least 1, got {}",
                config.identity.max_attempts
            ),
        });
    }

    if config.identity.base_delay_ms < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "identity.base_delay_ms must be at least 1, got {}",
                config.identity.base_delay_ms
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that a bucket name or prefix is usable by the external store.
fn check_bucket_token(value: &str, key: &str, errors: &mut Vec<ConfigError>) {
    if value.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
        return;
    }

    let ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !ok {
        errors.push(ConfigError::Validation {
            message: format!(
                "{key} `{value}` may only contain ASCII alphanumerics, `-`, `_`, and `.`"
            ),
        });
    }
}
