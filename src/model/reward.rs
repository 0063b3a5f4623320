// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{model::Code, slug::slug};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Reward document layout.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reward {
    pub reward_id: Code,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub associated_mission_ids: Vec<Code>,
    pub reward_type: RewardType,
    pub is_locked: bool,
    pub badge_icon: String,
}

impl Reward {
    /// File name of the backing document.
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", self.reward_id, slug(&self.title))
    }

    /// Cached copy stored inside linking missions.
    pub fn to_ref(&self) -> RewardRef {
        RewardRef {
            reward_type: self.reward_type,
            title: self.title.clone(),
            reward_id: self.reward_id.clone(),
        }
    }

    /// Lightweight listing record.
    pub fn view(&self) -> RewardView {
        RewardView {
            reward_id: self.reward_id.clone(),
            title: self.title.clone(),
            reward_type: self.reward_type,
            associated_mission_ids: self.associated_mission_ids.clone(),
        }
    }

    /// Associate mission. Returns true if the association is new.
    pub fn associate(&mut self, mission_code: Code) -> bool {
        if self.associated_mission_ids.contains(&mission_code) {
            return false;
        }

        self.associated_mission_ids.push(mission_code);
        true
    }

    /// Dissociate mission. Returns true if an association was removed.
    pub fn dissociate(&mut self, mission_code: &Code) -> bool {
        let before = self.associated_mission_ids.len();
        self.associated_mission_ids.retain(|code| code != mission_code);
        self.associated_mission_ids.len() != before
    }
}

/// Rarity tier of a reward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Apex,
    Legendary,
    Epic,
    Rare,
    #[default]
    Common,
}

impl RewardType {
    pub const ALL: [RewardType; 5] = [
        RewardType::Apex,
        RewardType::Legendary,
        RewardType::Epic,
        RewardType::Rare,
        RewardType::Common,
    ];
}

impl Display for RewardType {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::Apex => "apex",
            Self::Legendary => "legendary",
            Self::Epic => "epic",
            Self::Rare => "rare",
            Self::Common => "common",
        })
    }
}

/// Reward reference cached inside a mission.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RewardRef {
    pub reward_type: RewardType,
    pub title: String,
    pub reward_id: Code,
}

/// Reward listing record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardView {
    pub reward_id: Code,
    pub title: String,
    pub reward_type: RewardType,
    pub associated_mission_ids: Vec<Code>,
}
