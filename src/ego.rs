// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Alter-ego stat tracking.
//!
//! Each archetype may have an __alter-ego__ document holding its level, XP,
//! health, energy, and abilities. Closing a mission feeds the mission's stat
//! deltas into that document and appends a record to the shared history.
//!
//! # Data Root Layout
//!
//! ```text
//! alter-egoes/{archetype}.json
//! configs/xp-rules.json
//! history.json
//! ```
//!
//! Tracking is optional. When the alter-ego document or the XP rules are
//! missing, nothing is applied and nothing is recorded. Fields of the
//! alter-ego document that are not understood here are kept as they are.

use crate::{
    ledger::Closure,
    model::{Archetype, Code, StatChange, Status},
    store::{read_json, write_json, StoreError},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Reset point of an overflowing stat when the rules do not say.
pub const DEFAULT_OVERFLOW_RESET: i64 = 20;

/// Bonus granted to the other stat on overflow when the rules do not say.
pub const DEFAULT_OVERFLOW_BONUS: i64 = 10;

/// Alter-ego document layout.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AlterEgo {
    pub name: String,
    pub level: u32,
    pub title: String,
    pub xp_details: XpDetails,
    pub health_details: HealthDetails,
    pub energy_details: EnergyDetails,
    #[serde(default)]
    pub abilities: BTreeMap<String, i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct XpDetails {
    pub current_xp: i64,
    pub xp_to_next_level: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct HealthDetails {
    pub current_health: i64,
    pub max_health: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EnergyDetails {
    pub current_energy: i64,
    pub max_energy: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AlterEgo {
    /// Current stats in the shape recorded by history.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level,
            title: self.title.clone(),
            xp: self.xp_details.current_xp,
            health: self.health_details.current_health,
            energy: self.energy_details.current_energy,
            abilities: self.abilities.clone(),
        }
    }

    /// Apply stat deltas following the XP rules.
    ///
    /// XP carries over across as many levels as it covers. Health or energy
    /// reaching its maximum resets to the overflow point and grants a bonus
    /// to the other stat. Abilities the alter-ego does not have are ignored.
    pub fn apply(&mut self, change: &StatChange, rules: &XpRules) -> Applied {
        let mut delta = Delta::default();
        let mut events = Vec::new();

        if let Some(xp) = change.xp.filter(|xp| *xp != 0) {
            self.xp_details.current_xp += xp;
            delta.xp = xp;

            let mut threshold = rules.xp_to_next_level(self.level);
            while let Some(needed) = threshold.filter(|needed| *needed > 0) {
                if self.xp_details.current_xp < needed {
                    break;
                }

                self.xp_details.current_xp -= needed;
                self.level += 1;
                let rule = rules.level(self.level);
                if let Some(title) = rule.and_then(|rule| rule.title.clone()) {
                    self.title = title;
                }
                self.xp_details.xp_to_next_level = rule.and_then(|rule| rule.xp_to_next_level);
                threshold = self.xp_details.xp_to_next_level;
                events.push(StatEvent::LevelUp {
                    level: self.level,
                    title: self.title.clone(),
                });
            }
        }

        let overflow = &rules.health_energy_overflow;
        if change.health != 0 {
            self.health_details.current_health += change.health;
            delta.health += change.health;
            if self.health_details.current_health >= self.health_details.max_health {
                self.health_details.current_health = overflow.overflow_reset_percentage;
                self.energy_details.current_energy += overflow.overflow_bonus_to_other_stat;
                delta.energy += overflow.overflow_bonus_to_other_stat;
                events.push(StatEvent::Overflow {
                    stat: Stat::Health,
                    reset: overflow.overflow_reset_percentage,
                    bonus: overflow.overflow_bonus_to_other_stat,
                });
            }
        }

        if change.energy != 0 {
            self.energy_details.current_energy += change.energy;
            delta.energy += change.energy;
            if self.energy_details.current_energy >= self.energy_details.max_energy {
                self.energy_details.current_energy = overflow.overflow_reset_percentage;
                self.health_details.current_health += overflow.overflow_bonus_to_other_stat;
                delta.health += overflow.overflow_bonus_to_other_stat;
                events.push(StatEvent::Overflow {
                    stat: Stat::Energy,
                    reset: overflow.overflow_reset_percentage,
                    bonus: overflow.overflow_bonus_to_other_stat,
                });
            }
        }

        for (ability, value) in change.changed_abilities() {
            match self.abilities.get_mut(ability) {
                Some(current) => {
                    *current += value;
                    delta.abilities.insert(ability.to_string(), value);
                }
                None => events.push(StatEvent::UnknownAbility(ability.to_string())),
            }
        }

        Applied { delta, events }
    }
}

/// XP progression rules.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct XpRules {
    /// Level rules keyed by level number.
    #[serde(default)]
    pub levels: BTreeMap<String, LevelRule>,

    #[serde(default)]
    pub health_energy_overflow: OverflowRule,
}

impl XpRules {
    pub fn level(&self, level: u32) -> Option<&LevelRule> {
        self.levels.get(&level.to_string())
    }

    /// XP needed to leave a level.
    pub fn xp_to_next_level(&self, level: u32) -> Option<i64> {
        self.level(level).and_then(|rule| rule.xp_to_next_level)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelRule {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub xp_to_next_level: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct OverflowRule {
    #[serde(default = "default_overflow_reset")]
    pub overflow_reset_percentage: i64,
    #[serde(default = "default_overflow_bonus")]
    pub overflow_bonus_to_other_stat: i64,
}

impl Default for OverflowRule {
    fn default() -> Self {
        Self {
            overflow_reset_percentage: DEFAULT_OVERFLOW_RESET,
            overflow_bonus_to_other_stat: DEFAULT_OVERFLOW_BONUS,
        }
    }
}

fn default_overflow_reset() -> i64 {
    DEFAULT_OVERFLOW_RESET
}

fn default_overflow_bonus() -> i64 {
    DEFAULT_OVERFLOW_BONUS
}

/// Deltas actually applied, after overflow bonuses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Delta {
    pub xp: i64,
    pub health: i64,
    pub energy: i64,
    pub abilities: BTreeMap<String, i64>,
}

/// Stats of an alter-ego at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Snapshot {
    pub level: u32,
    pub title: String,
    pub xp: i64,
    pub health: i64,
    pub energy: i64,
    pub abilities: BTreeMap<String, i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    Health,
    Energy,
}

/// Notable things that happened while applying deltas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatEvent {
    LevelUp { level: u32, title: String },
    Overflow { stat: Stat, reset: i64, bonus: i64 },
    UnknownAbility(String),
}

/// Outcome of applying deltas to an alter-ego.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub delta: Delta,
    pub events: Vec<StatEvent>,
}

/// One record of the shared history.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub history_index: u64,
    #[serde(rename = "alter-ego")]
    pub alter_ego: Archetype,
    pub mission_associated: String,
    pub state: Status,
    pub delta_changed: Delta,
    pub state_after_delta_applied: Snapshot,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reward_unlocked: Vec<Code>,
}

/// Outcome of recording a mission closure against an alter-ego.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Display name of the alter-ego.
    pub name: String,
    pub applied: Applied,
    pub after: Snapshot,
    pub history_index: u64,
}

/// Alter-ego documents under a data root.
#[derive(Clone, Debug)]
pub struct Roster {
    root: PathBuf,
}

impl Roster {
    /// Construct new roster over data root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ego_path(&self, archetype: Archetype) -> PathBuf {
        self.root
            .join("alter-egoes")
            .join(format!("{}.json", archetype.key()))
    }

    pub fn rules_path(&self) -> PathBuf {
        self.root.join("configs").join("xp-rules.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.root.join("history.json")
    }

    /// Check if stats of an archetype are tracked.
    pub fn is_tracked(&self, archetype: Archetype) -> bool {
        self.ego_path(archetype).is_file() && self.rules_path().is_file()
    }

    /// Apply stat deltas of a closed mission and append to history.
    ///
    /// Returns `None` if the archetype is not tracked.
    ///
    /// # Errors
    ///
    /// - Return [`EgoError::Store`] if a document cannot be read or written.
    /// - Return [`EgoError::Serialize`] if the history entry cannot be encoded.
    #[instrument(skip(self, closure), level = "debug")]
    pub fn record(&self, closure: &Closure, date: NaiveDate) -> Result<Option<Record>> {
        let mission = &closure.mission.document;
        if !self.is_tracked(mission.archetype) {
            debug!("{} is not tracked, skip stats", mission.archetype.key());
            return Ok(None);
        }

        let ego_path = self.ego_path(mission.archetype);
        let rules: XpRules = read_json(self.rules_path())?;
        let mut ego: AlterEgo = read_json(&ego_path)?;
        let applied = ego.apply(&closure.stat_change, &rules);
        write_json(&ego_path, &ego)?;

        let after = ego.snapshot();
        let entry = HistoryEntry {
            history_index: 0,
            alter_ego: mission.archetype,
            mission_associated: closure.mission.location.stem().to_string(),
            state: mission.status,
            delta_changed: applied.delta.clone(),
            state_after_delta_applied: after.clone(),
            date,
            reward_unlocked: closure
                .unlocked
                .iter()
                .map(|reward| reward.reward_id.clone())
                .collect(),
        };
        let history_index = append_history(self.history_path(), entry)?;
        info!(
            "record {} stats for {} as history entry #{history_index}",
            ego.name, mission.mission_code
        );

        Ok(Some(Record {
            name: ego.name,
            applied,
            after,
            history_index,
        }))
    }
}

/// Append entry to history file, assigning the next history index.
///
/// Existing entries are kept untouched, whatever their shape.
fn append_history(path: impl AsRef<Path>, mut entry: HistoryEntry) -> Result<u64> {
    let path = path.as_ref();
    let mut history: Vec<Value> = match read_json(path) {
        Ok(history) => history,
        Err(StoreError::NotFound { .. }) => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    entry.history_index = history
        .iter()
        .filter_map(|record| record.get("history_index").and_then(Value::as_u64))
        .max()
        .map_or(1, |max| max + 1);
    let index = entry.history_index;
    history.push(serde_json::to_value(entry)?);
    write_json(path, &history)?;

    Ok(index)
}

/// Alter-ego error types.
#[derive(Debug, thiserror::Error)]
pub enum EgoError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode history entry")]
    Serialize(#[from] serde_json::Error),
}

/// Friendly result alias :3
pub type Result<T, E = EgoError> = std::result::Result<T, E>;
