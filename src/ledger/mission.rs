// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{
    ledger::{after_commit, validate_title, Ledger, LedgerError, Result, RewardDraft},
    model::{
        Archetype, ArchetypeStatChange, Code, Difficulty, Mission, Progress, Reward, StatChange,
        Status,
    },
    store::{Entry, Location, Shelf, Storage},
};

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

/// Everything needed to create a mission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissionDraft {
    pub archetype: Archetype,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub total: u32,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub mission_icon: String,
    pub stat_change: ArchetypeStatChange,
    pub reward: RewardPlan,
}

/// What to do about a reward when creating a mission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RewardPlan {
    /// Mission starts without a reward.
    #[default]
    None,

    /// Create a fresh locked reward for the mission.
    Create(RewardDraft),

    /// Link an existing reward.
    Link(Code),
}

/// Result of mission creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissionCreated {
    pub mission: Entry<Mission>,
    pub reward: Option<Reward>,
}

/// Result of completing or failing a mission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    /// Closed mission at its new location.
    pub mission: Entry<Mission>,

    /// Stat deltas matching the way the mission closed.
    pub stat_change: StatChange,

    /// Rewards unlocked by the closure.
    pub unlocked: Vec<Reward>,

    /// Linked rewards that were not locked anymore.
    pub skipped: Vec<Code>,
}

/// Set of edits to apply to a mission. Unset fields stay as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MissionChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub current: Option<u32>,
    pub total: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub mission_icon: Option<String>,
    pub stat_change: Option<ArchetypeStatChange>,
    pub status: Option<Status>,

    /// Existing rewards to link.
    pub link: Vec<Code>,

    /// Linked rewards to drop.
    pub unlink: Vec<Code>,

    /// Fresh reward to create and link.
    pub new_reward: Option<RewardDraft>,
}

impl MissionChanges {
    /// Check if nothing would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Result of mission modification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    /// Modified mission at its new location.
    pub mission: Entry<Mission>,

    /// Where the mission was before.
    pub previous: Location,

    /// Rewards unlocked because the mission became completed.
    pub unlocked: Vec<Reward>,
}

impl<S> Ledger<S>
where
    S: Storage,
{
    /// Create new mission.
    ///
    /// The mission code is allocated from the archetype prefix over both
    /// mission shelves. A reward created or linked through the plan is
    /// written before the mission, so the mission is written exactly once,
    /// already carrying its reward reference.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::Validation`] if a title is blank.
    /// - Return [`LedgerError::RewardNotFound`] if the linked reward does not
    ///   exist.
    /// - Return [`LedgerError::Taken`] if the mission file already exists.
    /// - Return [`LedgerError::PartialSync`] if the reward side was written,
    ///   but the mission was not.
    #[instrument(skip(self, draft), level = "debug")]
    pub fn create_mission(&self, draft: MissionDraft) -> Result<MissionCreated> {
        validate_title(&draft.title)?;
        if let RewardPlan::Create(reward) = &draft.reward {
            validate_title(&reward.title)?;
        }

        let code = self.allocate(&Shelf::MISSIONS, draft.archetype.prefix())?;
        let mut mission = Mission {
            archetype: draft.archetype,
            mission_code: code.clone(),
            title: draft.title,
            description: draft.description,
            difficulty: draft.difficulty,
            status: Status::NotStarted,
            progress: Progress::new(draft.total),
            archetype_stat_change: draft.stat_change,
            reward: Vec::new(),
            mission_icon: draft.mission_icon,
            due_date: draft.due_date,
            start_date: draft.start_date,
            completion_date: None,
        };
        let location = Location::new(Shelf::NotCompleted, mission.file_name());
        self.claim(&location)?;

        let mut committed = Vec::new();
        let reward = match draft.reward {
            RewardPlan::None => None,
            RewardPlan::Create(reward) => {
                let reward = RewardDraft {
                    mission: Some(code.clone()),
                    ..reward
                };
                let entry = self.insert_reward(reward)?;
                committed.push(format!("created reward {}", entry.document.reward_id));
                Some(entry.document)
            }
            RewardPlan::Link(reward_id) => {
                let Entry {
                    location: reward_location,
                    document: mut reward,
                } = self.reward(&reward_id)?;
                if reward.associate(code.clone()) {
                    self.store.write(&reward_location, &reward)?;
                    committed.push(format!("reward {reward_id} now lists {code}"));
                }
                Some(reward)
            }
        };

        if let Some(reward) = &reward {
            mission.link(reward.to_ref());
        }

        after_commit(&committed, self.store.write(&location, &mission))?;
        info!("create mission {code}: {:?}", mission.title);

        Ok(MissionCreated {
            mission: Entry {
                location,
                document: mission,
            },
            reward,
        })
    }

    /// Set current progress of an open mission.
    ///
    /// Status follows progress: zero is not started, anything below the total
    /// is in progress. Reaching or passing the total leaves status alone,
    /// since only an explicit complete or fail closes a mission.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::MissionNotFound`] if the mission does not exist.
    /// - Return [`LedgerError::MissionClosed`] if the mission was closed.
    #[instrument(skip(self), level = "debug")]
    pub fn update_progress(&self, code: &Code, current: u32) -> Result<Entry<Mission>> {
        let Entry {
            location,
            document: mut mission,
        } = self.open_mission(code)?;
        if mission.status.is_closed() {
            return Err(LedgerError::MissionClosed(code.clone()));
        }

        mission.set_progress(current);
        self.store.write(&location, &mission)?;
        info!(
            "mission {code} progress {}/{} ({})",
            mission.progress.current, mission.progress.total, mission.status
        );

        Ok(Entry {
            location,
            document: mission,
        })
    }

    /// Complete open mission.
    ///
    /// Progress is filled up to the total, and every linked reward that is
    /// still locked gets unlocked before the mission moves to the completed
    /// shelf.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::MissionNotFound`] if the mission does not exist.
    /// - Return [`LedgerError::MissionClosed`] if the mission already sits on
    ///   the completed shelf.
    /// - Return [`LedgerError::PartialSync`] if some rewards were unlocked,
    ///   but the mission could not be moved.
    #[instrument(skip(self), level = "debug")]
    pub fn complete_mission(&self, code: &Code, today: NaiveDate) -> Result<Closure> {
        self.close(code, Status::Completed, today)
    }

    /// Fail open mission.
    ///
    /// Linked rewards stay locked.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::MissionNotFound`] if the mission does not exist.
    /// - Return [`LedgerError::MissionClosed`] if the mission already sits on
    ///   the completed shelf.
    #[instrument(skip(self), level = "debug")]
    pub fn fail_mission(&self, code: &Code, today: NaiveDate) -> Result<Closure> {
        self.close(code, Status::Failed, today)
    }

    fn close(&self, code: &Code, outcome: Status, today: NaiveDate) -> Result<Closure> {
        // INVARIANT: Only open missions get closed.
        //   - A mission left on the not-completed shelf with a closed status
        //     was interrupted mid-close, so closing it again is allowed.
        let Entry {
            location,
            document: mut mission,
        } = self.open_mission(code)?;

        mission.status = outcome;
        mission.completion_date = Some(today);
        let stat_change = match outcome {
            Status::Completed => {
                if mission.progress.current < mission.progress.total {
                    mission.progress.current = mission.progress.total;
                }
                mission.archetype_stat_change.on_complete.clone()
            }
            _ => mission.archetype_stat_change.on_failure.clone(),
        };

        let target = Location::new(Shelf::Completed, mission.file_name());
        self.claim_move(&location, &target)?;

        let mut committed = Vec::new();
        let (unlocked, skipped) = match outcome {
            Status::Completed => self.unlock_linked(&mission, &mut committed)?,
            _ => (Vec::new(), Vec::new()),
        };

        after_commit(&committed, self.shelve(&location, &target, &mission))?;
        info!("{outcome} mission {code}: {:?}", mission.title);

        Ok(Closure {
            mission: Entry {
                location: target,
                document: mission,
            },
            stat_change,
            unlocked,
            skipped,
        })
    }

    /// Modify existing mission.
    ///
    /// Changing progress without an explicit status derives status from
    /// progress for open missions. Closing a mission through modification
    /// stamps the completion date, and completing it unlocks linked rewards.
    /// Reopening a mission clears the completion date. The file is renamed
    /// when the title changes, and moved when the status changes shelves.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::MissionNotFound`] if the mission does not exist.
    /// - Return [`LedgerError::RewardNotFound`] if a reward to link does not
    ///   exist.
    /// - Return [`LedgerError::Validation`] if a title is blank.
    /// - Return [`LedgerError::Taken`] if the new location is occupied.
    /// - Return [`LedgerError::PartialSync`] if reward changes were written,
    ///   but the mission was not.
    #[instrument(skip(self, changes), level = "debug")]
    pub fn modify_mission(
        &self,
        code: &Code,
        changes: MissionChanges,
        today: NaiveDate,
    ) -> Result<Revision> {
        let Entry {
            location,
            document: original,
        } = self.mission(code)?;

        let mut mission = original.clone();
        if let Some(title) = changes.title {
            validate_title(&title)?;
            mission.title = title;
        }

        if let Some(description) = changes.description {
            mission.description = description;
        }

        if let Some(difficulty) = changes.difficulty {
            mission.difficulty = difficulty;
        }

        if let Some(start_date) = changes.start_date {
            mission.start_date = start_date;
        }

        if let Some(due_date) = changes.due_date {
            mission.due_date = due_date;
        }

        if let Some(mission_icon) = changes.mission_icon {
            mission.mission_icon = mission_icon;
        }

        if let Some(stat_change) = changes.stat_change {
            mission.archetype_stat_change = stat_change;
        }

        if let Some(total) = changes.total {
            mission.progress.total = total;
        }

        if let Some(current) = changes.current {
            mission.progress.current = current;
        }

        match changes.status {
            Some(status) => mission.status = status,
            None if !mission.status.is_closed() => {
                if let Some(status) = Status::from_progress(&mission.progress) {
                    mission.status = status;
                }
            }
            None => {}
        }

        if mission.status.is_closed() {
            mission.completion_date.get_or_insert(today);
        } else {
            mission.completion_date = None;
        }

        if let Some(reward) = &changes.new_reward {
            validate_title(&reward.title)?;
        }

        let target = Location::new(
            Shelf::for_mission(mission.status.is_closed()),
            mission.file_name(),
        );
        self.claim_move(&location, &target)?;

        let mut links = Vec::new();
        for reward_id in &changes.link {
            links.push(self.reward(reward_id)?);
        }

        let mut committed = Vec::new();
        for reward_id in &changes.unlink {
            mission.unlink(reward_id);
            let Some(Entry {
                location: reward_location,
                document: mut reward,
            }) = after_commit(&committed, self.reward_if_exists(reward_id))?
            else {
                warn!("reward {reward_id} does not exist, dropping reference from {code}");
                continue;
            };

            if reward.dissociate(code) {
                after_commit(&committed, self.store.write(&reward_location, &reward))?;
                committed.push(format!("reward {reward_id} no longer lists {code}"));
            }
        }

        for Entry {
            location: reward_location,
            document: mut reward,
        } in links
        {
            if reward.associate(code.clone()) {
                after_commit(&committed, self.store.write(&reward_location, &reward))?;
                committed.push(format!("reward {} now lists {code}", reward.reward_id));
            }
            mission.link(reward.to_ref());
        }

        if let Some(reward) = changes.new_reward {
            let reward = RewardDraft {
                mission: Some(code.clone()),
                ..reward
            };
            let entry = after_commit(&committed, self.insert_reward(reward))?;
            committed.push(format!("created reward {}", entry.document.reward_id));
            mission.link(entry.document.to_ref());
        }

        let unlocked = if mission.status == Status::Completed && original.status != Status::Completed
        {
            self.unlock_linked(&mission, &mut committed)?.0
        } else {
            Vec::new()
        };

        after_commit(&committed, self.shelve(&location, &target, &mission))?;
        info!("modify mission {code}: {location} -> {target}");

        Ok(Revision {
            mission: Entry {
                location: target,
                document: mission,
            },
            previous: location,
            unlocked,
        })
    }

    /// Delete mission.
    ///
    /// Every linked reward forgets the mission before the mission file goes
    /// away. Links to rewards that no longer exist are skipped.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::MissionNotFound`] if the mission does not exist.
    /// - Return [`LedgerError::PartialSync`] if some rewards were updated, but
    ///   the mission file could not be removed.
    #[instrument(skip(self), level = "debug")]
    pub fn delete_mission(&self, code: &Code) -> Result<Mission> {
        let Entry {
            location,
            document: mission,
        } = self.mission(code)?;

        let mut committed = Vec::new();
        for link in &mission.reward {
            let reward_id = &link.reward_id;
            let Some(Entry {
                location: reward_location,
                document: mut reward,
            }) = after_commit(&committed, self.reward_if_exists(reward_id))?
            else {
                warn!("mission {code} links missing reward {reward_id}");
                continue;
            };

            if reward.dissociate(code) {
                after_commit(&committed, self.store.write(&reward_location, &reward))?;
                committed.push(format!("reward {reward_id} no longer lists {code}"));
            }
        }

        after_commit(&committed, self.store.remove(&location))?;
        info!("delete mission {code}: {:?}", mission.title);

        Ok(mission)
    }

    /// Find mission on the not-completed shelf.
    fn open_mission(&self, code: &Code) -> Result<Entry<Mission>> {
        if let Some(location) = self.store.locate(Shelf::NotCompleted, code)? {
            let document = self.store.read(&location)?;
            return Ok(Entry { location, document });
        }

        if self.store.locate(Shelf::Completed, code)?.is_some() {
            return Err(LedgerError::MissionClosed(code.clone()));
        }

        Err(LedgerError::MissionNotFound(code.clone()))
    }

    /// Unlock every reward linked to a mission, recording each unlock.
    fn unlock_linked(
        &self,
        mission: &Mission,
        committed: &mut Vec<String>,
    ) -> Result<(Vec<Reward>, Vec<Code>)> {
        let mut unlocked = Vec::new();
        let mut skipped = Vec::new();
        for link in &mission.reward {
            match after_commit(committed, self.unlock_reward(&link.reward_id))? {
                Some(reward) => {
                    committed.push(format!("unlocked reward {}", reward.reward_id));
                    unlocked.push(reward);
                }
                None => skipped.push(link.reward_id.clone()),
            }
        }

        Ok((unlocked, skipped))
    }
}
