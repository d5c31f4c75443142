// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome of one cleanup run.

use serde::Serialize;

/// What a cleanup run did. A run never fails outright; partial failures
/// degrade the counts and land here as error strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Expired entries successfully removed in the TTL phase.
    pub expired: usize,
    /// Over-quota entries successfully removed in the quota phase.
    pub deleted: usize,
    /// One entry per individual failure, in the order encountered.
    pub errors: Vec<String>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
