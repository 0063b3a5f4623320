// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{
    ledger::{after_commit, validate_title, Ledger, Result},
    model::{code::REWARD_PREFIX, Code, Reward, RewardType, RewardView},
    store::{Entry, Location, Shelf, Storage},
};

use tracing::{debug, info, instrument, warn};

/// Everything needed to create a reward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardDraft {
    pub title: String,
    pub description: String,
    pub reward_type: RewardType,
    pub badge_icon: String,

    /// Mission to attach the reward to.
    pub mission: Option<Code>,
}

/// Set of edits to apply to a reward. Unset fields stay as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reward_type: Option<RewardType>,
    pub badge_icon: Option<String>,

    /// Missions that should link the reward.
    pub associate: Vec<Code>,

    /// Missions that should stop linking the reward.
    pub dissociate: Vec<Code>,
}

impl RewardChanges {
    /// Check if nothing would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl<S> Ledger<S>
where
    S: Storage,
{
    /// Listing of every reward on a shelf.
    pub fn rewards(&self, shelf: Shelf) -> Result<Vec<RewardView>> {
        Ok(self
            .store
            .list::<Reward>(shelf)?
            .into_iter()
            .map(|entry| entry.document.view())
            .collect())
    }

    /// Create new locked reward.
    ///
    /// If the draft names a mission, the reward is written first already
    /// listing it, then the mission gains the reward reference.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::Validation`] if the title is blank.
    /// - Return [`LedgerError::MissionNotFound`] if the named mission does not
    ///   exist.
    /// - Return [`LedgerError::PartialSync`] if the reward was written, but the
    ///   mission was not.
    ///
    /// [`LedgerError::Validation`]: crate::ledger::LedgerError::Validation
    /// [`LedgerError::MissionNotFound`]: crate::ledger::LedgerError::MissionNotFound
    /// [`LedgerError::PartialSync`]: crate::ledger::LedgerError::PartialSync
    #[instrument(skip(self, draft), level = "debug")]
    pub fn create_reward(&self, draft: RewardDraft) -> Result<Entry<Reward>> {
        validate_title(&draft.title)?;
        let mission = draft
            .mission
            .as_ref()
            .map(|code| self.mission(code))
            .transpose()?;

        let entry = self.insert_reward(draft)?;
        if let Some(Entry {
            location,
            document: mut mission,
        }) = mission
        {
            mission.link(entry.document.to_ref());
            let committed = [format!(
                "created reward {} for {}",
                entry.document.reward_id, mission.mission_code
            )];
            after_commit(&committed, self.store.write(&location, &mission))?;
        }

        info!(
            "create reward {}: {:?}",
            entry.document.reward_id, entry.document.title
        );

        Ok(entry)
    }

    /// Allocate and write fresh locked reward, leaving missions alone.
    pub(super) fn insert_reward(&self, draft: RewardDraft) -> Result<Entry<Reward>> {
        validate_title(&draft.title)?;
        let reward_id = self.allocate(&Shelf::REWARDS, REWARD_PREFIX)?;
        let reward = Reward {
            reward_id,
            title: draft.title,
            description: draft.description,
            associated_mission_ids: draft.mission.into_iter().collect(),
            reward_type: draft.reward_type,
            is_locked: true,
            badge_icon: draft.badge_icon,
        };

        let location = Location::new(Shelf::Locked, reward.file_name());
        self.claim(&location)?;
        self.store.write(&location, &reward)?;

        Ok(Entry {
            location,
            document: reward,
        })
    }

    /// Modify existing reward.
    ///
    /// The reward is written first. Then missions that lost the reward drop
    /// their reference, and every associated mission gets its cached title
    /// and type refreshed. The file is renamed last when the title changed.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::RewardNotFound`] if the reward does not exist.
    /// - Return [`LedgerError::MissionNotFound`] if a mission to associate does
    ///   not exist.
    /// - Return [`LedgerError::Validation`] if the title is blank.
    /// - Return [`LedgerError::Taken`] if the new file name is occupied.
    /// - Return [`LedgerError::PartialSync`] if the reward was written, but a
    ///   mission or the rename was not.
    ///
    /// [`LedgerError::RewardNotFound`]: crate::ledger::LedgerError::RewardNotFound
    /// [`LedgerError::MissionNotFound`]: crate::ledger::LedgerError::MissionNotFound
    /// [`LedgerError::Validation`]: crate::ledger::LedgerError::Validation
    /// [`LedgerError::Taken`]: crate::ledger::LedgerError::Taken
    /// [`LedgerError::PartialSync`]: crate::ledger::LedgerError::PartialSync
    #[instrument(skip(self, changes), level = "debug")]
    pub fn modify_reward(&self, reward_id: &Code, changes: RewardChanges) -> Result<Entry<Reward>> {
        let Entry {
            location,
            document: mut reward,
        } = self.reward(reward_id)?;

        if let Some(title) = changes.title {
            validate_title(&title)?;
            reward.title = title;
        }

        if let Some(description) = changes.description {
            reward.description = description;
        }

        if let Some(reward_type) = changes.reward_type {
            reward.reward_type = reward_type;
        }

        if let Some(badge_icon) = changes.badge_icon {
            reward.badge_icon = badge_icon;
        }

        let target = Location::new(location.shelf, reward.file_name());
        self.claim_move(&location, &target)?;

        for code in &changes.dissociate {
            reward.dissociate(code);
        }

        for code in &changes.associate {
            self.mission(code)?;
            reward.associate(code.clone());
        }

        // INVARIANT: Gather every mission to touch before the first write.
        //   - Dropped missions still link the reward.
        //   - Kept missions have a stale or missing cached reference.
        let mut dropped = Vec::new();
        for code in &changes.dissociate {
            if reward.associated_mission_ids.contains(code) {
                continue;
            }

            match self.mission_if_exists(code)? {
                Some(entry) if entry.document.links(reward_id) => dropped.push(entry),
                Some(_) => {}
                None => warn!("mission {code} does not exist, nothing to unlink"),
            }
        }

        let reference = reward.to_ref();
        let mut stale = Vec::new();
        for code in &reward.associated_mission_ids {
            match self.mission_if_exists(code)? {
                Some(entry) if entry.document.reward.contains(&reference) => {}
                Some(entry) => stale.push(entry),
                None => warn!("reward {reward_id} lists missing mission {code}"),
            }
        }

        self.store.write(&location, &reward)?;
        let mut committed = vec![format!("reward {reward_id} updated")];

        for Entry {
            location: mission_location,
            document: mut mission,
        } in dropped
        {
            mission.unlink(reward_id);
            after_commit(&committed, self.store.write(&mission_location, &mission))?;
            committed.push(format!(
                "mission {} no longer links {reward_id}",
                mission.mission_code
            ));
        }

        for Entry {
            location: mission_location,
            document: mut mission,
        } in stale
        {
            mission.link(reference.clone());
            after_commit(&committed, self.store.write(&mission_location, &mission))?;
            committed.push(format!("mission {} links {reward_id}", mission.mission_code));
        }

        after_commit(&committed, self.store.relocate(&location, &target))?;
        info!("modify reward {reward_id}: {location} -> {target}");

        Ok(Entry {
            location: target,
            document: reward,
        })
    }

    /// Delete reward.
    ///
    /// Every associated mission drops its reference before the reward file
    /// goes away. Associations with missions that no longer exist are skipped.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::RewardNotFound`] if the reward does not exist.
    /// - Return [`LedgerError::PartialSync`] if some missions were updated, but
    ///   the reward file could not be removed.
    ///
    /// [`LedgerError::RewardNotFound`]: crate::ledger::LedgerError::RewardNotFound
    /// [`LedgerError::PartialSync`]: crate::ledger::LedgerError::PartialSync
    #[instrument(skip(self), level = "debug")]
    pub fn delete_reward(&self, reward_id: &Code) -> Result<Reward> {
        let Entry {
            location,
            document: reward,
        } = self.reward(reward_id)?;

        let mut committed = Vec::new();
        for code in &reward.associated_mission_ids {
            let Some(Entry {
                location: mission_location,
                document: mut mission,
            }) = after_commit(&committed, self.mission_if_exists(code))?
            else {
                warn!("reward {reward_id} lists missing mission {code}");
                continue;
            };

            if mission.unlink(reward_id) {
                after_commit(&committed, self.store.write(&mission_location, &mission))?;
                committed.push(format!("mission {code} no longer links {reward_id}"));
            }
        }

        after_commit(&committed, self.store.remove(&location))?;
        info!("delete reward {reward_id}: {:?}", reward.title);

        Ok(reward)
    }

    /// Unlock reward if it is still locked.
    ///
    /// Returns `None` when the reward is not on the locked shelf, so unlocking
    /// twice is harmless.
    #[instrument(skip(self), level = "debug")]
    pub(super) fn unlock_reward(&self, reward_id: &Code) -> Result<Option<Reward>> {
        let Some(location) = self.store.locate(Shelf::Locked, reward_id)? else {
            if self.store.locate(Shelf::Unlocked, reward_id)?.is_some() {
                debug!("reward {reward_id} already unlocked, skip");
            } else {
                warn!("reward {reward_id} does not exist, skip");
            }
            return Ok(None);
        };

        let mut reward: Reward = self.store.read(&location)?;
        reward.is_locked = false;

        let target = Location::new(
            Shelf::for_reward(reward.is_locked),
            location.file_name.clone(),
        );
        self.claim(&target)?;
        self.shelve(&location, &target, &reward)?;
        info!("unlock reward {reward_id}: {:?}", reward.title);

        Ok(Some(reward))
    }
}
