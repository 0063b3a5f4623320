// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Terminal rendering.
//!
//! Everything here builds strings, so the shell decides when to print.

use crate::{
    command::{Outcome, StatReport},
    ego::{Record, Stat, StatEvent},
    ledger::{Closure, LedgerError},
    model::{Archetype, Mission, RewardView, StatChange, Status},
    store::Entry,
};

use colored::{ColoredString, Colorize};
use std::{error::Error, fmt::Write};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub fn header(text: &str) -> String {
    format!(
        "\n{}\n{}\n{}",
        RULE.magenta(),
        format!("  {text}").magenta().bold(),
        RULE.magenta()
    )
}

pub fn success(text: &str) -> String {
    format!("✓ {text}").green().to_string()
}

pub fn info(text: &str) -> String {
    format!("ℹ {text}").blue().to_string()
}

pub fn warning(text: &str) -> String {
    format!("⚠ {text}").yellow().to_string()
}

pub fn error(err: &LedgerError) -> String {
    let mut out = format!("✗ {err}").red().to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, "\n  {}", format!("caused by: {cause}").red());
        source = cause.source();
    }

    out
}

/// Color text by archetype.
pub fn archetype(archetype: Archetype, text: &str) -> ColoredString {
    match archetype {
        Archetype::Kei => text.cyan(),
        Archetype::MrRobot => text.green(),
        Archetype::Tyler => text.red(),
    }
}

/// Color text by mission status.
pub fn status(status: Status, text: &str) -> ColoredString {
    match status {
        Status::NotStarted => text.yellow(),
        Status::InProgress => text.cyan(),
        Status::Completed => text.green(),
        Status::Failed => text.red(),
    }
}

/// Short one-line label of a mission, used in selection lists.
pub fn mission_label(mission: &Mission) -> String {
    format!(
        "[{}] {} ({}, {}/{})",
        mission.mission_code,
        mission.title,
        mission.status,
        mission.progress.current,
        mission.progress.total
    )
}

/// Short one-line label of a reward, used in selection lists.
pub fn reward_label(reward: &RewardView) -> String {
    format!(
        "[{}] {} ({})",
        reward.reward_id, reward.title, reward.reward_type
    )
}

/// Numbered listing of missions under a heading.
pub fn missions(label: &str, entries: &[Entry<Mission>]) -> String {
    if entries.is_empty() {
        return warning(&format!("No {label} missions found"));
    }

    let mut out = format!("\n{}", format!("{} MISSIONS:", label.to_uppercase()).bold());
    for (index, Entry { document, .. }) in entries.iter().enumerate() {
        let code = format!("[{}]", document.mission_code);
        let _ = write!(
            out,
            "\n  {} {} {}",
            format!("{}.", index + 1).blue(),
            archetype(document.archetype, &code),
            document.title.bold()
        );
        let _ = write!(
            out,
            "\n      Archetype: {} | Status: {} | Progress: {}/{} ({}%)",
            archetype(document.archetype, document.archetype.name()),
            status(document.status, &document.status.to_string()),
            document.progress.current,
            document.progress.total,
            document.progress.percent()
        );
        let _ = write!(out, "\n      Due: {}", document.due_date);
    }

    out
}

/// Numbered listing of rewards under a heading.
pub fn rewards(label: &str, views: &[RewardView]) -> String {
    if views.is_empty() {
        return warning(&format!("No {label} rewards found"));
    }

    let mut out = format!("\n{}", format!("{} REWARDS:", label.to_uppercase()).bold());
    for (index, view) in views.iter().enumerate() {
        let missions = if view.associated_mission_ids.is_empty() {
            "None".to_string()
        } else {
            view.associated_mission_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = write!(
            out,
            "\n  {} {}",
            format!("{}. [{}]", index + 1, view.reward_id).blue(),
            view.title
        );
        let _ = write!(
            out,
            "\n      Type: {} | Missions: {missions}",
            view.reward_type
        );
    }

    out
}

/// Stat deltas as a signed list.
pub fn stat_change(heading: &str, change: &StatChange) -> String {
    let mut out = format!("\n{}", heading.green());
    if let Some(xp) = change.xp {
        let _ = write!(out, "\n  XP: {xp:+}");
    }
    let _ = write!(out, "\n  Health: {:+}", change.health);
    let _ = write!(out, "\n  Energy: {:+}", change.energy);

    let mut abilities = change.changed_abilities().peekable();
    if abilities.peek().is_some() {
        let _ = write!(out, "\n{}", "  Abilities:".green());
        for (name, value) in abilities {
            let _ = write!(out, "\n    • {name}: {value:+}");
        }
    }

    out
}

fn closure(closure: &Closure, stats: &StatReport) -> String {
    let mission = &closure.mission.document;
    let mut lines = Vec::new();
    for reward in &closure.unlocked {
        lines.push(success(&format!("🎁 Reward unlocked: {}", reward.title)));
    }
    for reward_id in &closure.skipped {
        lines.push(info(&format!("Reward {reward_id} was not locked, skipped")));
    }

    match stats {
        StatReport::Applied(record) => lines.push(ego_record(record)),
        StatReport::Untracked => {}
        StatReport::Failed(reason) => {
            lines.push(warning(&format!("Stats were not applied: {reason}")))
        }
    }

    match mission.status {
        Status::Completed => {
            lines.push(success(&format!("Mission completed: {}", mission.title)));
            lines.push(stat_change("REWARDS EARNED:", &closure.stat_change));
        }
        _ => {
            lines.push(warning(&format!("Mission failed: {}", mission.title)));
            lines.push(stat_change("PENALTIES APPLIED:", &closure.stat_change));
        }
    }
    lines.push(info(&format!("Moved to: {}", closure.mission.location)));

    lines.join("\n")
}

fn ego_record(record: &Record) -> String {
    let mut lines = Vec::new();
    for event in &record.applied.events {
        lines.push(match event {
            StatEvent::LevelUp { level, title } => format!(
                "🎉 LEVEL UP! {} is now Level {level} - {title}!",
                record.name
            )
            .green()
            .to_string(),
            StatEvent::Overflow { stat, reset, bonus } => {
                let (this, other) = match stat {
                    Stat::Health => ("Health", "energy"),
                    Stat::Energy => ("Energy", "health"),
                };
                format!("💫 {this} overflow! Reset to {reset}, +{bonus} {other}")
                    .cyan()
                    .to_string()
            }
            StatEvent::UnknownAbility(ability) => {
                warning(&format!("Unknown ability '{ability}' for {}", record.name))
            }
        });
    }
    lines.push(success(&format!("Updated {} stats", record.name)));
    lines.push(success(&format!(
        "📝 History recorded (entry #{})",
        record.history_index
    )));

    lines.join("\n")
}

/// Describe what a command did.
pub fn outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Unavailable(reason) => {
            format!("{}\n{}", warning("Feature coming soon!"), info(reason))
        }
        Outcome::MissionCreated(created) => {
            let mission = &created.mission.document;
            let mut lines = vec![
                success(&format!("Mission created: {}", mission.title)),
                info(&format!("Mission Code: {}", mission.mission_code)),
                info(&format!("Assigned to: {}", mission.archetype.name())),
                info(&format!("File: {}", created.mission.location.file_name)),
            ];
            if let Some(reward) = &created.reward {
                lines.push(info(&format!(
                    "Reward: [{}] {}",
                    reward.reward_id, reward.title
                )));
            }
            lines.join("\n")
        }
        Outcome::MissionClosed { closure: report, stats } => closure(report, stats),
        Outcome::ProgressUpdated(entry) => {
            let mission = &entry.document;
            let mut lines = vec![success(&format!(
                "Progress updated: {}/{} ({}%)",
                mission.progress.current,
                mission.progress.total,
                mission.progress.percent()
            ))];
            if mission.progress.current >= mission.progress.total {
                lines.push(warning(
                    "Progress complete! Use 'Mark Mission as Completed' to officially complete.",
                ));
            }
            lines.join("\n")
        }
        Outcome::MissionModified(revision) => {
            let mut lines = vec![success(&format!(
                "Mission updated: {}",
                revision.mission.document.title
            ))];
            if revision.previous != revision.mission.location {
                lines.push(info(&format!("File moved to: {}", revision.mission.location)));
            }
            for reward in &revision.unlocked {
                lines.push(success(&format!("🎁 Reward unlocked: {}", reward.title)));
            }
            lines.join("\n")
        }
        Outcome::MissionDeleted(mission) => {
            success(&format!("Mission deleted: {}", mission.title))
        }
        Outcome::Missions { open, closed } => format!(
            "{}\n{}",
            missions("not-completed", open),
            missions("completed", closed)
        ),
        Outcome::Rewards { locked, unlocked } => format!(
            "{}\n{}",
            rewards("locked", locked),
            rewards("unlocked", unlocked)
        ),
        Outcome::RewardCreated(entry) => [
            success(&format!("Reward created: {}", entry.document.title)),
            info(&format!("Reward ID: {}", entry.document.reward_id)),
            info(&format!("File: {}", entry.location.file_name)),
        ]
        .join("\n"),
        Outcome::RewardModified(entry) => [
            success(&format!("Reward updated: {}", entry.document.title)),
            info(&format!("File: {}", entry.location)),
        ]
        .join("\n"),
        Outcome::RewardDeleted(reward) => success(&format!("Reward deleted: {}", reward.title)),
        Outcome::Exit => farewell(),
    }
}

/// Parting words.
pub fn farewell() -> String {
    [
        format!("\n{}", RULE.red()),
        "  First rule of Fight Club:".red().to_string(),
        "    You do not talk about Fight Club.".red().to_string(),
        "  Second rule of Fight Club:".red().to_string(),
        "    You DO NOT talk about Fight Club.".red().to_string(),
        format!("{}\n", RULE.red()),
        info("Stay strong! 💪"),
    ]
    .join("\n")
}
