// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for external collaborators.

pub mod kv;

pub use kv::{KvBackend, KvBucket, KvEntry};
