// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope-aware storage for cairn memories.
//!
//! Three layers sit between callers and the external keyed store:
//!
//! - [`BucketRouter`] maps a memory scope plus routing context to a physical
//!   bucket and caches the handle
//! - [`ScopedStore`] is the facade the rest of the workspace talks to: JSON
//!   codec, personal-key prefixing, and prefix listings
//! - [`load_identity`] reads the agent identity record the supervisor wrote
//!   into the agent's user bucket
//!
//! Isolation between projects, between users, and between both and the
//! global bucket is structural: distinct scopes route to distinct buckets,
//! so no filtering step can leak across them.

pub mod identity;
pub mod router;
pub mod scoped;

pub use identity::load_identity;
pub use router::{BucketRouter, RouteContext};
pub use scoped::{ScopedStore, PERSONAL_KEY_PREFIX};
