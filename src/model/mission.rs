// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{
    model::{Archetype, Code, RewardRef},
    slug::slug,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Mission document layout.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mission {
    pub archetype: Archetype,
    pub mission_code: Code,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub status: Status,
    pub progress: Progress,
    pub archetype_stat_change: ArchetypeStatChange,
    #[serde(default)]
    pub reward: Vec<RewardRef>,
    pub mission_icon: String,
    pub due_date: NaiveDate,
    pub start_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
}

impl Mission {
    /// File name of the backing document.
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", self.mission_code, slug(&self.title))
    }

    /// Check if mission links target reward.
    pub fn links(&self, reward_id: &Code) -> bool {
        self.reward.iter().any(|entry| &entry.reward_id == reward_id)
    }

    /// Link reward, or refresh the cached copy if already linked.
    pub fn link(&mut self, reward: RewardRef) {
        match self
            .reward
            .iter_mut()
            .find(|entry| entry.reward_id == reward.reward_id)
        {
            Some(entry) => *entry = reward,
            None => self.reward.push(reward),
        }
    }

    /// Drop link to reward. Returns true if a link was removed.
    pub fn unlink(&mut self, reward_id: &Code) -> bool {
        let before = self.reward.len();
        self.reward.retain(|entry| &entry.reward_id != reward_id);
        self.reward.len() != before
    }

    /// Set current progress, deriving status from it.
    ///
    /// Reaching the total does not finish the mission. Closing a mission is
    /// always an explicit operator decision, so status stays where it was.
    pub fn set_progress(&mut self, current: u32) {
        self.progress.current = current;
        if let Some(status) = Status::from_progress(&self.progress) {
            self.status = status;
        }
    }
}

/// How hard a mission is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl Display for Difficulty {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

/// Mission lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Failed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::NotStarted,
        Status::InProgress,
        Status::Completed,
        Status::Failed,
    ];

    /// Check if status is terminal.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Status implied by progress alone.
    ///
    /// Returns `None` once progress reaches the total, since only an explicit
    /// complete or fail may end a mission.
    pub fn from_progress(progress: &Progress) -> Option<Self> {
        if progress.current == 0 {
            Some(Self::NotStarted)
        } else if progress.current < progress.total {
            Some(Self::InProgress)
        } else {
            None
        }
    }
}

impl Display for Status {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// Units done out of units planned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
}

impl Progress {
    /// Fresh progress toward target total.
    pub fn new(total: u32) -> Self {
        Self { current: 0, total }
    }

    /// Completion ratio as a whole percentage. Zero total counts as zero.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }

        let percent =
            (u64::from(self.current) * 100 + u64::from(self.total) / 2) / u64::from(self.total);
        u32::try_from(percent).unwrap_or(u32::MAX)
    }
}

/// Stat deltas applied to an archetype when a mission closes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArchetypeStatChange {
    pub on_complete: StatChange,
    pub on_failure: StatChange,
}

/// One set of stat deltas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<i64>,
    #[serde(default)]
    pub health: i64,
    #[serde(default)]
    pub energy: i64,
    #[serde(default)]
    pub abilities: BTreeMap<String, i64>,
}

impl StatChange {
    /// Abilities with a non-zero delta.
    pub fn changed_abilities(&self) -> impl Iterator<Item = (&str, i64)> {
        self.abilities
            .iter()
            .filter(|(_, delta)| **delta != 0)
            .map(|(name, delta)| (name.as_str(), *delta))
    }
}
