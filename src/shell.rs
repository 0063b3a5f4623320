// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Interactive menu shell.
//!
//! The shell shows the main menu, walks the operator through the prompts of
//! the chosen operation, and hands the resulting [`Command`] to [`dispatch`].
//! Whatever comes back gets rendered, and the menu shows up again.
//!
//! # Cancellation
//!
//! Pressing Escape in any prompt abandons the current operation and returns
//! to the main menu without writing anything. Pressing Ctrl-C ends the
//! session. Operation failures are printed, and the menu keeps going.

pub mod prompt;
pub mod render;

use crate::{
    command::{dispatch, Command, Outcome},
    config::Defaults,
    ego::Roster,
    ledger::{Ledger, LedgerError, MissionChanges, MissionDraft, RewardChanges, RewardDraft, RewardPlan},
    model::{Archetype, ArchetypeStatChange, Code, Difficulty, Mission, RewardType, Status},
    store::{Entry, JsonStore, Shelf, Storage},
};

use chrono::{Local, NaiveDate};
use colored::Colorize;
use inquire::InquireError;
use prompt::Choice;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{debug, instrument};

/// Entries of the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    AddDailyEntry,
    CreateMission,
    CompleteMission,
    FailMission,
    UpdateProgress,
    ModifyMission,
    DeleteMission,
    ViewMissions,
    ManageRewards,
    Exit,
}

impl MenuItem {
    /// Every entry, in menu order.
    pub const ALL: [MenuItem; 10] = [
        MenuItem::AddDailyEntry,
        MenuItem::CreateMission,
        MenuItem::CompleteMission,
        MenuItem::FailMission,
        MenuItem::UpdateProgress,
        MenuItem::ModifyMission,
        MenuItem::DeleteMission,
        MenuItem::ViewMissions,
        MenuItem::ManageRewards,
        MenuItem::Exit,
    ];

    /// Position in the menu, starting at one.
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|item| *item == self)
            .map_or(0, |index| index + 1)
    }
}

impl Display for MenuItem {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            Self::AddDailyEntry => "📝 Add Daily Progress Entry (Coming Soon)",
            Self::CreateMission => "🎯 Create New Mission",
            Self::CompleteMission => "✅ Mark Mission as Completed",
            Self::FailMission => "❌ Mark Mission as Failed",
            Self::UpdateProgress => "📈 Update Mission Progress",
            Self::ModifyMission => "✏️  Modify Mission",
            Self::DeleteMission => "🗑️  Delete Mission",
            Self::ViewMissions => "📊 View All Missions",
            Self::ManageRewards => "🎁 Manage Rewards",
            Self::Exit => "🚪 Exit",
        };
        write!(fmt, "{:>2}. {label}", self.number())
    }
}

/// Entries of the reward menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RewardMenuItem {
    View,
    Create,
    Modify,
    Delete,
    Back,
}

impl RewardMenuItem {
    const ALL: [RewardMenuItem; 5] = [
        RewardMenuItem::View,
        RewardMenuItem::Create,
        RewardMenuItem::Modify,
        RewardMenuItem::Delete,
        RewardMenuItem::Back,
    ];
}

impl Display for RewardMenuItem {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::View => "View All Rewards",
            Self::Create => "Create New Reward",
            Self::Modify => "Modify Reward",
            Self::Delete => "Delete Reward",
            Self::Back => "Back to Main Menu",
        })
    }
}

/// Ways to attach a reward while creating a mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RewardAction {
    Skip,
    Create,
    Link,
}

impl Display for RewardAction {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::Skip => "No reward",
            Self::Create => "Create new reward",
            Self::Link => "Link to existing reward",
        })
    }
}

/// Whether the menu loop should go on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive menu over a ledger.
#[derive(Debug)]
pub struct Shell<S = JsonStore>
where
    S: Storage,
{
    ledger: Ledger<S>,
    roster: Roster,
    defaults: Defaults,
}

impl<S> Shell<S>
where
    S: Storage,
{
    /// Construct new shell.
    pub fn new(ledger: Ledger<S>, roster: Roster, defaults: Defaults) -> Self {
        Self {
            ledger,
            roster,
            defaults,
        }
    }

    /// Run menu loop until the operator exits.
    ///
    /// # Errors
    ///
    /// - Return [`ShellError::Prompt`] if the terminal cannot be prompted at
    ///   all, e.g., when standard input is not a terminal.
    pub fn run(&self) -> Result<()> {
        loop {
            println!("{}", render::header("FIGHT CLUB - ALTER EGO MANAGEMENT"));
            let item = match prompt::select("What would you like to do?", MenuItem::ALL.to_vec()) {
                Ok(item) => item,
                Err(InquireError::OperationCanceled) => continue,
                Err(InquireError::OperationInterrupted) => {
                    interrupted();
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            match self.run_item(item) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(ShellError::Prompt(InquireError::OperationCanceled)) => {
                    println!("{}", render::info("Operation cancelled"));
                }
                Err(ShellError::Prompt(InquireError::OperationInterrupted)) => {
                    interrupted();
                    return Ok(());
                }
                Err(ShellError::Prompt(err)) => return Err(err.into()),
                Err(ShellError::Ledger(err)) => println!("{}", render::error(&err)),
            }
        }
    }

    #[instrument(skip(self), level = "debug")]
    fn run_item(&self, item: MenuItem) -> Result<Flow> {
        let today = Local::now().date_naive();
        let command = match item {
            MenuItem::AddDailyEntry => {
                println!("{}", render::header("ADD DAILY PROGRESS ENTRY"));
                Some(Command::AddDailyEntry)
            }
            MenuItem::CreateMission => self.create_mission(today)?,
            MenuItem::CompleteMission => {
                println!("{}", render::header("MARK MISSION AS COMPLETED"));
                self.pick_mission(Shelf::NotCompleted, "Select mission to complete")?
                    .map(|entry| Command::CompleteMission(entry.document.mission_code))
            }
            MenuItem::FailMission => {
                println!("{}", render::header("MARK MISSION AS FAILED"));
                self.pick_mission(Shelf::NotCompleted, "Select mission to mark as failed")?
                    .map(|entry| Command::FailMission(entry.document.mission_code))
            }
            MenuItem::UpdateProgress => self.update_progress()?,
            MenuItem::ModifyMission => self.modify_mission()?,
            MenuItem::DeleteMission => self.delete_mission()?,
            MenuItem::ViewMissions => {
                println!("{}", render::header("ALL MISSIONS"));
                Some(Command::ViewMissions)
            }
            MenuItem::ManageRewards => self.manage_rewards()?,
            MenuItem::Exit => Some(Command::Exit),
        };

        match command {
            Some(command) => self.execute(command, today),
            None => Ok(Flow::Continue),
        }
    }

    fn execute(&self, command: Command, today: NaiveDate) -> Result<Flow> {
        debug!("dispatch {command:?}");
        let outcome = dispatch(&self.ledger, &self.roster, command, today)?;
        println!("{}", render::outcome(&outcome));

        Ok(match outcome {
            Outcome::Exit => Flow::Exit,
            _ => Flow::Continue,
        })
    }

    fn create_mission(&self, today: NaiveDate) -> Result<Option<Command>> {
        println!("{}", render::header("ADD NEW MISSION"));
        let archetype = prompt::select("Alter ego", Archetype::ALL.to_vec())?;
        let title = prompt::title("Mission title", None)?;
        let description = prompt::text("Mission description", "")?;
        let difficulty =
            prompt::select_from("Difficulty", Difficulty::ALL.to_vec(), &Difficulty::default())?;
        let total = prompt::count("Total units to complete (e.g., days, tasks)", 1)?;
        let start_date = prompt::date("Start date", Some(today))?;
        let due_date = prompt::date("Due date", None)?;
        let mission_icon = prompt::text("Mission icon path", &self.defaults.mission_icon)?;

        println!("\n{}", "STAT CHANGES ON COMPLETION:".bold());
        let on_complete = prompt::stat_change(archetype, None)?;
        println!("\n{}", "STAT CHANGES ON FAILURE:".bold());
        let on_failure = prompt::stat_change(archetype, None)?;

        let reward = match prompt::select(
            "Reward",
            vec![RewardAction::Skip, RewardAction::Create, RewardAction::Link],
        )? {
            RewardAction::Skip => RewardPlan::None,
            RewardAction::Create => RewardPlan::Create(self.reward_draft()?),
            RewardAction::Link => match self.pick_reward(Shelf::Locked, "Select reward")? {
                Some(reward_id) => RewardPlan::Link(reward_id),
                None => RewardPlan::None,
            },
        };

        Ok(Some(Command::CreateMission(MissionDraft {
            archetype,
            title,
            description,
            difficulty,
            total,
            start_date,
            due_date,
            mission_icon,
            stat_change: ArchetypeStatChange {
                on_complete,
                on_failure,
            },
            reward,
        })))
    }

    fn update_progress(&self) -> Result<Option<Command>> {
        println!("{}", render::header("UPDATE MISSION PROGRESS"));
        let Some(Entry { document, .. }) =
            self.pick_mission(Shelf::NotCompleted, "Select mission to update")?
        else {
            return Ok(None);
        };

        println!(
            "\n{}\nCurrent Progress: {}/{} ({}%)",
            format!("Mission: {}", document.title).cyan(),
            document.progress.current,
            document.progress.total,
            document.progress.percent()
        );
        let current = prompt::count(
            &format!("Enter new progress value (0-{})", document.progress.total),
            document.progress.current,
        )?;

        Ok(Some(Command::UpdateProgress {
            code: document.mission_code,
            current,
        }))
    }

    fn modify_mission(&self) -> Result<Option<Command>> {
        println!("{}", render::header("MODIFY MISSION"));
        let shelf = pick_shelf(Shelf::MISSIONS)?;
        let Some(Entry {
            document: mission, ..
        }) = self.pick_mission(shelf, "Select mission to modify")?
        else {
            return Ok(None);
        };

        println!("\n{}", format!("Modifying: {}", mission.title).bold());
        println!("{}", render::info("Press Enter to keep current value"));

        let mut changes = MissionChanges::default();
        let title = prompt::title("Title", Some(&mission.title))?;
        changes.title = changed(title, &mission.title);
        let description = prompt::text("Description", &mission.description)?;
        changes.description = changed(description, &mission.description);
        let difficulty =
            prompt::select_from("Difficulty", Difficulty::ALL.to_vec(), &mission.difficulty)?;
        changes.difficulty = changed(difficulty, &mission.difficulty);
        let current = prompt::count("Current progress", mission.progress.current)?;
        changes.current = changed(current, &mission.progress.current);
        let total = prompt::count("Total progress", mission.progress.total)?;
        changes.total = changed(total, &mission.progress.total);
        let start_date = prompt::date("Start date", Some(mission.start_date))?;
        changes.start_date = changed(start_date, &mission.start_date);
        let due_date = prompt::date("Due date", Some(mission.due_date))?;
        changes.due_date = changed(due_date, &mission.due_date);
        let mission_icon = prompt::text("Mission icon path", &mission.mission_icon)?;
        changes.mission_icon = changed(mission_icon, &mission.mission_icon);

        if prompt::confirm("Modify stat changes?", false)? {
            let current = &mission.archetype_stat_change;
            println!("\n{}", "STAT CHANGES ON COMPLETION:".bold());
            let on_complete = prompt::stat_change(mission.archetype, Some(&current.on_complete))?;
            println!("\n{}", "STAT CHANGES ON FAILURE:".bold());
            let on_failure = prompt::stat_change(mission.archetype, Some(&current.on_failure))?;
            let stat_change = ArchetypeStatChange {
                on_complete,
                on_failure,
            };
            changes.stat_change = changed(stat_change, current);
        }

        if prompt::confirm("Modify rewards?", false)? {
            self.mission_rewards(&mission, &mut changes)?;
        }

        let mut statuses = vec![Choice::new("Keep current status", None)];
        statuses.extend(
            Status::ALL
                .into_iter()
                .map(|status| Choice::new(status.to_string(), Some(status))),
        );
        changes.status = prompt::choose("Status", statuses)?.filter(|status| *status != mission.status);

        if changes.is_empty() {
            println!("{}", render::info("Nothing to change"));
            return Ok(None);
        }

        Ok(Some(Command::ModifyMission {
            code: mission.mission_code,
            changes,
        }))
    }

    fn mission_rewards(&self, mission: &Mission, changes: &mut MissionChanges) -> Result<()> {
        if !mission.reward.is_empty() {
            let linked = mission
                .reward
                .iter()
                .map(|link| {
                    Choice::new(
                        format!("[{}] {} ({})", link.reward_id, link.title, link.reward_type),
                        link.reward_id.clone(),
                    )
                })
                .collect();
            changes.unlink = prompt::choose_many("Rewards to remove", linked)?;
        }

        let linkable = self
            .ledger
            .rewards(Shelf::Locked)?
            .into_iter()
            .filter(|view| !mission.links(&view.reward_id))
            .map(|view| Choice::new(render::reward_label(&view), view.reward_id))
            .collect::<Vec<_>>();
        if !linkable.is_empty() {
            changes.link = prompt::choose_many("Existing rewards to link", linkable)?;
        }

        if prompt::confirm("Create a new reward for this mission?", false)? {
            changes.new_reward = Some(self.reward_draft()?);
        }

        Ok(())
    }

    fn delete_mission(&self) -> Result<Option<Command>> {
        println!("{}", render::header("DELETE MISSION"));
        let shelf = pick_shelf(Shelf::MISSIONS)?;
        let Some(Entry { document, .. }) = self.pick_mission(shelf, "Select mission to delete")?
        else {
            return Ok(None);
        };

        if !document.reward.is_empty() {
            let rewards = document
                .reward
                .iter()
                .map(|link| link.reward_id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{}",
                render::warning(&format!("Rewards {rewards} will forget this mission."))
            );
        }

        if !prompt::confirm(
            &format!("Are you sure you want to delete '{}'?", document.title),
            false,
        )? {
            println!("{}", render::info("Deletion cancelled"));
            return Ok(None);
        }

        Ok(Some(Command::DeleteMission(document.mission_code)))
    }

    fn manage_rewards(&self) -> Result<Option<Command>> {
        println!("{}", render::header("MANAGE REWARDS"));
        match prompt::select("Reward Management", RewardMenuItem::ALL.to_vec())? {
            RewardMenuItem::View => {
                println!("{}", render::header("ALL REWARDS"));
                Ok(Some(Command::ViewRewards))
            }
            RewardMenuItem::Create => {
                println!("{}", render::header("CREATE REWARD"));
                let mut draft = self.reward_draft()?;
                if prompt::confirm("Associate with a mission?", false)? {
                    draft.mission = self
                        .pick_mission(Shelf::NotCompleted, "Select mission")?
                        .map(|entry| entry.document.mission_code);
                }
                Ok(Some(Command::CreateReward(draft)))
            }
            RewardMenuItem::Modify => self.modify_reward(),
            RewardMenuItem::Delete => self.delete_reward(),
            RewardMenuItem::Back => Ok(None),
        }
    }

    fn modify_reward(&self) -> Result<Option<Command>> {
        println!("{}", render::header("MODIFY REWARD"));
        let shelf = pick_shelf(Shelf::REWARDS)?;
        let Some(reward_id) = self.pick_reward(shelf, "Select reward to modify")? else {
            return Ok(None);
        };
        let reward = self.ledger.reward(&reward_id)?.document;

        println!("\n{}", format!("Modifying: {}", reward.title).bold());
        println!("{}", render::info("Press Enter to keep current value"));

        let mut changes = RewardChanges::default();
        let title = prompt::title("Title", Some(&reward.title))?;
        changes.title = changed(title, &reward.title);
        let description = prompt::text("Description", &reward.description)?;
        changes.description = changed(description, &reward.description);
        let reward_type =
            prompt::select_from("Reward type", RewardType::ALL.to_vec(), &reward.reward_type)?;
        changes.reward_type = changed(reward_type, &reward.reward_type);
        let badge_icon = prompt::text("Badge icon path", &reward.badge_icon)?;
        changes.badge_icon = changed(badge_icon, &reward.badge_icon);

        if prompt::confirm("Modify associated missions?", false)? {
            if !reward.associated_mission_ids.is_empty() {
                let current = reward
                    .associated_mission_ids
                    .iter()
                    .map(|code| Choice::new(code.to_string(), code.clone()))
                    .collect();
                changes.dissociate = prompt::choose_many("Missions to remove", current)?;
            }

            let mut candidates = Vec::new();
            for shelf in Shelf::MISSIONS {
                candidates.extend(
                    self.ledger
                        .missions(shelf)?
                        .into_iter()
                        .filter(|entry| {
                            !reward
                                .associated_mission_ids
                                .contains(&entry.document.mission_code)
                        })
                        .map(|entry| {
                            Choice::new(
                                render::mission_label(&entry.document),
                                entry.document.mission_code,
                            )
                        }),
                );
            }
            if !candidates.is_empty() {
                changes.associate = prompt::choose_many("Missions to add", candidates)?;
            }
        }

        if changes.is_empty() {
            println!("{}", render::info("Nothing to change"));
            return Ok(None);
        }

        Ok(Some(Command::ModifyReward { reward_id, changes }))
    }

    fn delete_reward(&self) -> Result<Option<Command>> {
        println!("{}", render::header("DELETE REWARD"));
        let shelf = pick_shelf(Shelf::REWARDS)?;
        let Some(reward_id) = self.pick_reward(shelf, "Select reward to delete")? else {
            return Ok(None);
        };
        let reward = self.ledger.reward(&reward_id)?.document;

        println!("\n{}", format!("Reward: {}", reward.title).red());
        if !reward.associated_mission_ids.is_empty() {
            let missions = reward
                .associated_mission_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{}",
                render::warning(&format!(
                    "This reward is associated with missions: {missions}"
                ))
            );
            println!(
                "{}",
                render::warning("Deleting will remove reward references from these missions.")
            );
        }

        if !prompt::confirm(
            &format!("Are you sure you want to delete '{}'?", reward.title),
            false,
        )? {
            println!("{}", render::info("Deletion cancelled"));
            return Ok(None);
        }

        Ok(Some(Command::DeleteReward(reward_id)))
    }

    fn reward_draft(&self) -> Result<RewardDraft> {
        let title = prompt::title("Reward title", None)?;
        let description = prompt::text("Reward description", "")?;
        let reward_type =
            prompt::select_from("Reward type", RewardType::ALL.to_vec(), &RewardType::default())?;
        let badge_icon = prompt::text("Badge icon path", &self.defaults.badge_icon)?;

        Ok(RewardDraft {
            title,
            description,
            reward_type,
            badge_icon,
            mission: None,
        })
    }

    fn pick_mission(&self, shelf: Shelf, message: &str) -> Result<Option<Entry<Mission>>> {
        let entries = self.ledger.missions(shelf)?;
        if entries.is_empty() {
            println!("{}", render::warning(&format!("No {shelf} missions found")));
            return Ok(None);
        }

        let choices = entries
            .into_iter()
            .map(|entry| Choice::new(render::mission_label(&entry.document), entry))
            .collect();

        Ok(Some(prompt::choose(message, choices)?))
    }

    fn pick_reward(&self, shelf: Shelf, message: &str) -> Result<Option<Code>> {
        let views = self.ledger.rewards(shelf)?;
        if views.is_empty() {
            println!("{}", render::warning(&format!("No {shelf} rewards found")));
            return Ok(None);
        }

        let choices = views
            .into_iter()
            .map(|view| Choice::new(render::reward_label(&view), view.reward_id))
            .collect();

        Ok(Some(prompt::choose(message, choices)?))
    }
}

fn pick_shelf(shelves: [Shelf; 2]) -> Result<Shelf> {
    let choices = shelves
        .into_iter()
        .map(|shelf| Choice::new(shelf_label(shelf), shelf))
        .collect();

    Ok(prompt::choose("Folder", choices)?)
}

fn shelf_label(shelf: Shelf) -> &'static str {
    match shelf {
        Shelf::NotCompleted => "Not Completed",
        Shelf::Completed => "Completed",
        Shelf::Locked => "Locked",
        Shelf::Unlocked => "Unlocked",
    }
}

/// Keep a value only if it differs from the current one.
fn changed<T: PartialEq>(value: T, current: &T) -> Option<T> {
    (value != *current).then_some(value)
}

fn interrupted() {
    println!("\n{}", render::warning("Operation cancelled by user"));
}

/// Shell error types.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Terminal prompt failed or was abandoned.
    #[error(transparent)]
    Prompt(#[from] InquireError),

    /// Ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Friendly result alias :3
pub type Result<T, E = ShellError> = std::result::Result<T, E>;
