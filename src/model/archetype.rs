// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Persona a mission is assigned to.
///
/// Each archetype owns a code prefix and a fixed set of abilities that its
/// missions may change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    Kei,
    MrRobot,
    Tyler,
}

impl Archetype {
    /// Every archetype, in menu order.
    pub const ALL: [Archetype; 3] = [Archetype::Kei, Archetype::MrRobot, Archetype::Tyler];

    /// Letter that prefixes mission codes of this archetype.
    pub fn prefix(self) -> char {
        match self {
            Self::Kei => 'K',
            Self::MrRobot => 'M',
            Self::Tyler => 'T',
        }
    }

    /// Identifier used in JSON and in alter-ego file names.
    pub fn key(self) -> &'static str {
        match self {
            Self::Kei => "kei",
            Self::MrRobot => "mr-robot",
            Self::Tyler => "tyler",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Kei => "Kei",
            Self::MrRobot => "Mr-Robot",
            Self::Tyler => "Tyler",
        }
    }

    pub fn role(self) -> &'static str {
        match self {
            Self::Kei => "The Monk of Still Waters",
            Self::MrRobot => "The Architect of Systems",
            Self::Tyler => "The Untamed Wolf",
        }
    }

    /// Abilities that stat changes of this archetype may touch.
    pub fn abilities(self) -> &'static [&'static str] {
        match self {
            Self::Kei => &[
                "self-control",
                "peace",
                "wisdom",
                "focus",
                "resilience",
                "harmony",
                "mindfulness",
                "intuition",
            ],
            Self::MrRobot => &[
                "intelligence",
                "logic",
                "adaptability",
                "innovation",
                "focus",
                "systemization",
                "precision",
                "speed",
            ],
            Self::Tyler => &[
                "strength",
                "discipline",
                "agression",
                "confidence",
                "dominance",
                "pain tolerance",
                "honor",
                "determination",
            ],
        }
    }
}

impl Display for Archetype {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{} - {}", self.name(), self.role())
    }
}
