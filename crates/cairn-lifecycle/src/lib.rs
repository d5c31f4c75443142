// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Eviction for cairn memories.
//!
//! Recall hides expired entries but never removes them; this crate owns the
//! deletes. [`LifecycleManager::run`] sweeps one project in two phases, TTL
//! expiry then per-category quotas, and reports what happened in a
//! [`CleanupReport`] instead of failing partway.

pub mod manager;
pub mod report;

pub use manager::LifecycleManager;
pub use report::CleanupReport;
