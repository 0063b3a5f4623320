// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Operator commands.
//!
//! The menu shell gathers everything an operation needs into a [`Command`],
//! and [`dispatch`] carries it out against the ledger. Dispatch never talks to
//! the terminal. What happened comes back as an [`Outcome`] for the shell to
//! render.

use crate::{
    ego::{Record, Roster},
    ledger::{
        Closure, Ledger, MissionChanges, MissionCreated, MissionDraft, Result, Revision,
        RewardChanges, RewardDraft,
    },
    model::{Code, Mission, Reward, RewardView},
    store::{Entry, Shelf, Storage},
};

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

/// Everything the operator can ask for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Log daily progress. Not available yet.
    AddDailyEntry,
    CreateMission(MissionDraft),
    CompleteMission(Code),
    FailMission(Code),
    UpdateProgress { code: Code, current: u32 },
    ModifyMission { code: Code, changes: MissionChanges },
    DeleteMission(Code),
    ViewMissions,
    ViewRewards,
    CreateReward(RewardDraft),
    ModifyReward { reward_id: Code, changes: RewardChanges },
    DeleteReward(Code),
    Exit,
}

/// What a command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Command names a feature that does not exist yet.
    Unavailable(&'static str),
    MissionCreated(MissionCreated),
    MissionClosed { closure: Closure, stats: StatReport },
    ProgressUpdated(Entry<Mission>),
    MissionModified(Revision),
    MissionDeleted(Mission),
    Missions {
        open: Vec<Entry<Mission>>,
        closed: Vec<Entry<Mission>>,
    },
    Rewards {
        locked: Vec<RewardView>,
        unlocked: Vec<RewardView>,
    },
    RewardCreated(Entry<Reward>),
    RewardModified(Entry<Reward>),
    RewardDeleted(Reward),
    Exit,
}

/// What happened to alter-ego stats after a mission closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatReport {
    /// Archetype has no alter-ego document or no XP rules.
    Untracked,

    /// Stats were applied and recorded.
    Applied(Record),

    /// Stats could not be applied. The mission stays closed.
    Failed(String),
}

/// Carry out command.
///
/// # Errors
///
/// - Return [`LedgerError`](crate::ledger::LedgerError) if the underlying
///   ledger operation fails.
#[instrument(skip(ledger, roster), level = "debug")]
pub fn dispatch<S>(
    ledger: &Ledger<S>,
    roster: &Roster,
    command: Command,
    today: NaiveDate,
) -> Result<Outcome>
where
    S: Storage,
{
    let outcome = match command {
        Command::AddDailyEntry => {
            Outcome::Unavailable("daily progress entries are not supported yet")
        }
        Command::CreateMission(draft) => Outcome::MissionCreated(ledger.create_mission(draft)?),
        Command::CompleteMission(code) => {
            close_with_stats(roster, ledger.complete_mission(&code, today)?, today)
        }
        Command::FailMission(code) => {
            close_with_stats(roster, ledger.fail_mission(&code, today)?, today)
        }
        Command::UpdateProgress { code, current } => {
            Outcome::ProgressUpdated(ledger.update_progress(&code, current)?)
        }
        Command::ModifyMission { code, changes } => {
            Outcome::MissionModified(ledger.modify_mission(&code, changes, today)?)
        }
        Command::DeleteMission(code) => Outcome::MissionDeleted(ledger.delete_mission(&code)?),
        Command::ViewMissions => Outcome::Missions {
            open: ledger.missions(Shelf::NotCompleted)?,
            closed: ledger.missions(Shelf::Completed)?,
        },
        Command::ViewRewards => Outcome::Rewards {
            locked: ledger.rewards(Shelf::Locked)?,
            unlocked: ledger.rewards(Shelf::Unlocked)?,
        },
        Command::CreateReward(draft) => Outcome::RewardCreated(ledger.create_reward(draft)?),
        Command::ModifyReward { reward_id, changes } => {
            Outcome::RewardModified(ledger.modify_reward(&reward_id, changes)?)
        }
        Command::DeleteReward(reward_id) => {
            Outcome::RewardDeleted(ledger.delete_reward(&reward_id)?)
        }
        Command::Exit => Outcome::Exit,
    };

    Ok(outcome)
}

fn close_with_stats(roster: &Roster, closure: Closure, today: NaiveDate) -> Outcome {
    let stats = match roster.record(&closure, today) {
        Ok(Some(record)) => StatReport::Applied(record),
        Ok(None) => StatReport::Untracked,
        Err(err) => {
            warn!("stats for {} not applied: {err:?}", closure.mission.document.mission_code);
            StatReport::Failed(err.to_string())
        }
    };
    info!(
        "closed {} with {} unlocked rewards",
        closure.mission.document.mission_code,
        closure.unlocked.len()
    );

    Outcome::MissionClosed { closure, stats }
}
