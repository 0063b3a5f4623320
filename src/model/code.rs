// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Prefix of every reward identifier.
pub const REWARD_PREFIX: char = 'R';

/// Human readable identifier of a mission or reward.
///
/// A code is one uppercase letter followed by a sequence number padded to at
/// least two digits, e.g., `K01` or `R12`. Numbers past 99 simply widen, so
/// the hundredth Kei mission is `K100`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code {
    prefix: char,
    number: u32,
}

impl Code {
    /// Construct new code.
    ///
    /// The prefix is upper-cased.
    pub fn new(prefix: char, number: u32) -> Self {
        Self {
            prefix: prefix.to_ascii_uppercase(),
            number,
        }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Extract code embedded at the start of a document file name.
    ///
    /// Accepts `K01-meditate.json`, `K01.json`, and bare `K01`. Returns `None`
    /// for anything that does not start with a valid code.
    pub fn from_file_name(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref();
        let stem = name.strip_suffix(".json").unwrap_or(name);
        let head = stem.split('-').next().unwrap_or(stem);
        head.parse().ok()
    }
}

impl Display for Code {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{}{:02}", self.prefix, self.number)
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let data = data.trim();
        let mut chars = data.chars();
        let prefix = match chars.next() {
            Some(prefix) if prefix.is_ascii_alphabetic() => prefix,
            _ => return Err(CodeError::Prefix(data.into())),
        };

        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CodeError::Number(data.into()));
        }

        let number = digits
            .parse()
            .map_err(|_| CodeError::Number(data.into()))?;

        Ok(Self::new(prefix, number))
    }
}

impl TryFrom<String> for Code {
    type Error = CodeError;

    fn try_from(data: String) -> Result<Self, Self::Error> {
        data.parse()
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.to_string()
    }
}

/// Code parsing error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    /// Code does not start with a letter.
    #[error("code {0:?} must start with a letter")]
    Prefix(String),

    /// Code does not continue with a sequence number.
    #[error("code {0:?} must end with a sequence number")]
    Number(String),
}
