// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Sequence number allocation.
//!
//! Codes are handed out as `max + 1` over every code already on disk that
//! carries the same prefix. Gaps left by deleted documents are never reused,
//! so a code never silently changes meaning between two runs.
//!
//! Allocation is a pure function over a snapshot of existing codes. Gathering
//! that snapshot is the storage layer's job, see
//! [`Storage::codes`](crate::store::Storage::codes).

use crate::model::Code;

/// Next sequence number for a prefix.
///
/// Returns `Some(1)` when no code carries the prefix, and `None` when the
/// highest code already sits at `u32::MAX`.
pub fn next_sequence_number<'a>(
    prefix: char,
    codes: impl IntoIterator<Item = &'a Code>,
) -> Option<u32> {
    let prefix = prefix.to_ascii_uppercase();
    codes
        .into_iter()
        .filter(|code| code.prefix() == prefix)
        .map(Code::number)
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

/// Next code for a prefix, if any is left.
pub fn next_code<'a>(prefix: char, codes: impl IntoIterator<Item = &'a Code>) -> Option<Code> {
    next_sequence_number(prefix, codes).map(|number| Code::new(prefix, number))
}
