// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Operator prompts.
//!
//! Thin wrappers over [`inquire`] that reject malformed input on the spot and
//! ask again. Escape surfaces as [`InquireError::OperationCanceled`], and
//! Ctrl-C as [`InquireError::OperationInterrupted`].

use crate::{
    ledger::validate_title,
    model::{Archetype, StatChange},
};

use chrono::NaiveDate;
use inquire::{validator::Validation, Confirm, CustomType, InquireError, MultiSelect, Select, Text};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Friendly result alias :3
pub type Result<T, E = InquireError> = std::result::Result<T, E>;

/// Selectable value with its own label.
#[derive(Clone, Debug)]
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl<T> Display for Choice<T> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(&self.label)
    }
}

/// Pick one of many labeled values.
pub fn choose<T>(message: &str, choices: Vec<Choice<T>>) -> Result<T> {
    Ok(Select::new(message, choices).prompt()?.value)
}

/// Pick any number of labeled values.
pub fn choose_many<T>(message: &str, choices: Vec<Choice<T>>) -> Result<Vec<T>> {
    Ok(MultiSelect::new(message, choices)
        .prompt()?
        .into_iter()
        .map(|choice| choice.value)
        .collect())
}

/// Pick one of many displayable values.
pub fn select<T: Display>(message: &str, options: Vec<T>) -> Result<T> {
    Select::new(message, options).prompt()
}

/// Pick one of many displayable values, starting on a given one.
pub fn select_from<T>(message: &str, options: Vec<T>, current: &T) -> Result<T>
where
    T: Display + PartialEq,
{
    let start = options
        .iter()
        .position(|option| option == current)
        .unwrap_or_default();
    Select::new(message, options).with_starting_cursor(start).prompt()
}

/// Ask for a non-blank title that makes a valid file name.
pub fn title(message: &str, current: Option<&str>) -> Result<String> {
    let mut prompt = Text::new(message).with_validator(|input: &str| Ok(check_title(input)));
    if let Some(current) = current {
        prompt = prompt.with_default(current);
    }

    Ok(prompt.prompt()?.trim().to_string())
}

/// Same rules the ledger applies, checked while typing.
fn check_title(input: &str) -> Validation {
    match validate_title(input) {
        Ok(()) => Validation::Valid,
        Err(err) => Validation::Invalid(err.to_string().into()),
    }
}

/// Ask for free text, falling back on a default when left empty.
pub fn text(message: &str, default: &str) -> Result<String> {
    Text::new(message).with_default(default).prompt()
}

/// Ask for a non-negative count.
pub fn count(message: &str, default: u32) -> Result<u32> {
    CustomType::<u32>::new(message)
        .with_default(default)
        .with_error_message("Please type a whole number, zero or more")
        .prompt()
}

/// Ask for a signed stat delta.
pub fn delta(message: &str, default: i64) -> Result<i64> {
    CustomType::<i64>::new(message)
        .with_default(default)
        .with_error_message("Please type a whole number, e.g., 5 or -3")
        .prompt()
}

/// Ask for a calendar date.
pub fn date(message: &str, default: Option<NaiveDate>) -> Result<NaiveDate> {
    let mut prompt = CustomType::<NaiveDate>::new(message)
        .with_placeholder("YYYY-MM-DD")
        .with_error_message("Please type a date as YYYY-MM-DD");
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }

    prompt.prompt()
}

/// Ask a yes or no question.
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    Confirm::new(message).with_default(default).prompt()
}

/// Ask for one set of stat deltas of an archetype.
///
/// Every ability of the archetype is asked for, and recorded even when left
/// at zero.
pub fn stat_change(archetype: Archetype, current: Option<&StatChange>) -> Result<StatChange> {
    let xp = delta(
        "XP change",
        current.and_then(|change| change.xp).unwrap_or_default(),
    )?;
    let health = delta(
        "Health change",
        current.map(|change| change.health).unwrap_or_default(),
    )?;
    let energy = delta(
        "Energy change",
        current.map(|change| change.energy).unwrap_or_default(),
    )?;

    let mut change = StatChange {
        xp: (xp != 0).then_some(xp),
        health,
        energy,
        ..Default::default()
    };
    for ability in archetype.abilities() {
        let default = current
            .and_then(|change| change.abilities.get(*ability).copied())
            .unwrap_or_default();
        let value = delta(&format!("  {}", capitalize(ability)), default)?;
        change.abilities.insert(ability.to_string(), value);
    }

    Ok(change)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
