// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Title slugging.
//!
//! Every mission and reward document is named `{code}-{slug}.json`, where the
//! slug is derived from the document's title. The derivation is deliberately
//! dumb: lower-case everything and turn each space into a hyphen. Punctuation
//! survives and runs of hyphens are not collapsed, so odd titles make odd but
//! stable file names.

/// Derive filesystem token from a title.
pub fn slug(title: impl AsRef<str>) -> String {
    title.as_ref().to_lowercase().replace(' ', "-")
}
