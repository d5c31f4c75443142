// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for cairn integration tests.
//!
//! Provides a deterministic in-memory stand-in for the external keyed store,
//! a manually advanced clock, and memory fixtures, so every crate in the
//! workspace can test scoping, recall, and lifecycle behavior without an
//! external service.
//!
//! # Components
//!
//! - [`MemoryKvBackend`] - in-memory `KvBackend` with TTL and failure injection
//! - [`ManualClock`] - `Clock` that only moves when told to
//! - [`MemoryBuilder`] - fluent fixture builder for `Memory` records

pub mod backend;
pub mod clock;
pub mod fixtures;

pub use backend::{MemoryKvBackend, MemoryKvBucket};
pub use clock::ManualClock;
pub use fixtures::MemoryBuilder;
