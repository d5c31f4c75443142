// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Digest rendering for recall results.

use cairn_core::limits::{SUMMARY_MAX_BYTES, SUMMARY_MIN_FRAGMENT_BYTES};
use cairn_core::types::Memory;

const ELLIPSIS: &str = "…";

/// Render the sorted, truncated recall list as a markdown digest.
///
/// Entries are appended as `## {category}\n{content}\n\n` blocks until the
/// next block would push past [`SUMMARY_MAX_BYTES`]. When the overflowing
/// block still has room for its header and a useful fragment of content, a
/// truncated fragment ending in an ellipsis is appended instead; either way
/// iteration stops there. Truncation never splits a multi-byte character.
pub fn build_summary(memories: &[Memory]) -> String {
    let mut out = String::new();
    for memory in memories {
        let header = format!("## {}\n", memory.category);
        let remaining = SUMMARY_MAX_BYTES - out.len();

        if header.len() + memory.content.len() + 2 <= remaining {
            out.push_str(&header);
            out.push_str(&memory.content);
            out.push_str("\n\n");
            continue;
        }

        let overhead = header.len() + ELLIPSIS.len();
        if remaining >= overhead + SUMMARY_MIN_FRAGMENT_BYTES {
            out.push_str(&header);
            out.push_str(truncate_to_char_boundary(
                &memory.content,
                remaining - overhead,
            ));
            out.push_str(ELLIPSIS);
        }
        break;
    }
    out
}

/// Longest prefix of `s` that fits in `max_bytes` whole characters.
fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
