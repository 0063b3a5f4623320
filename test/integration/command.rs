// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{code, date, mission_draft, DataRootFixture};

use fight_club::{
    command::{dispatch, Command, Outcome, StatReport},
    ego::{AlterEgo, StatEvent},
    model::{Archetype, Mission},
    store::{read_json, Entry, Shelf},
};

use anyhow::Result;
use indoc::indoc;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use serde_json::{json, Value};

const KEI: &str = indoc! {r#"
    {
        "name": "Kei",
        "level": 1,
        "title": "Novice",
        "quote": "Still waters run deep",
        "xp_details": { "current_xp": 90, "xp_to_next_level": 100 },
        "health_details": { "current_health": 80, "max_health": 100 },
        "energy_details": { "current_energy": 50, "max_energy": 100 },
        "abilities": { "focus": 3, "peace": 1 }
    }
"#};

const XP_RULES: &str = indoc! {r#"
    {
        "levels": {
            "1": { "title": "Novice", "xp_to_next_level": 100 },
            "2": { "title": "Adept", "xp_to_next_level": 150 }
        }
    }
"#};

#[sealed_test]
fn unavailable_and_exit_touch_nothing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let today = date(2025, 1, 1);

    let result = dispatch(&fixture.ledger, &fixture.roster, Command::AddDailyEntry, today)?;
    assert!(matches!(result, Outcome::Unavailable(_)));
    let result = dispatch(&fixture.ledger, &fixture.roster, Command::Exit, today)?;
    assert_eq!(result, Outcome::Exit);

    for shelf in Shelf::ALL {
        assert!(fixture.file_names(shelf)?.is_empty());
    }

    Ok(())
}

#[sealed_test]
fn view_missions_splits_open_from_closed() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let today = date(2025, 1, 15);
    for title in ["Meditate", "Journal", "Stretch"] {
        dispatch(
            &fixture.ledger,
            &fixture.roster,
            Command::CreateMission(mission_draft(Archetype::Kei, title)),
            today,
        )?;
    }
    dispatch(
        &fixture.ledger,
        &fixture.roster,
        Command::FailMission(code('K', 2)),
        today,
    )?;

    let Outcome::Missions { open, closed } = dispatch(
        &fixture.ledger,
        &fixture.roster,
        Command::ViewMissions,
        today,
    )?
    else {
        panic!("expected mission listing");
    };

    let titles = |entries: &[Entry<Mission>]| {
        entries
            .iter()
            .map(|entry| entry.document.title.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(titles(&open), vec!["Meditate", "Stretch"]);
    assert_eq!(titles(&closed), vec!["Journal"]);

    Ok(())
}

#[sealed_test]
fn closing_untracked_archetype_skips_stats() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    fixture
        .ledger
        .create_mission(mission_draft(Archetype::Tyler, "Run 5k"))?;

    let outcome = dispatch(
        &fixture.ledger,
        &fixture.roster,
        Command::CompleteMission(code('T', 1)),
        date(2025, 1, 20),
    )?;
    let Outcome::MissionClosed { stats, .. } = outcome else {
        panic!("expected closed mission");
    };
    assert_eq!(stats, StatReport::Untracked);
    assert!(!fixture.roster.history_path().exists());

    Ok(())
}

#[sealed_test]
fn closing_tracked_archetype_applies_stats_and_appends_history() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    fixture.track(Archetype::Kei, KEI, XP_RULES)?;
    fixture
        .ledger
        .create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    fixture
        .ledger
        .create_mission(mission_draft(Archetype::Kei, "Journal"))?;

    let outcome = dispatch(
        &fixture.ledger,
        &fixture.roster,
        Command::CompleteMission(code('K', 1)),
        date(2025, 1, 20),
    )?;
    let Outcome::MissionClosed {
        stats: StatReport::Applied(record),
        ..
    } = outcome
    else {
        panic!("expected applied stats");
    };
    assert_eq!(record.history_index, 1);
    assert_eq!(record.after.level, 2);
    assert_eq!(record.after.title, "Adept");
    assert_eq!(record.after.xp, 40);
    assert_eq!(record.after.health, 85);
    assert_eq!(record.after.energy, 45);
    assert_eq!(record.after.abilities.get("focus"), Some(&5));
    assert_eq!(
        record.applied.events,
        vec![StatEvent::LevelUp {
            level: 2,
            title: "Adept".into()
        }]
    );

    let outcome = dispatch(
        &fixture.ledger,
        &fixture.roster,
        Command::FailMission(code('K', 2)),
        date(2025, 1, 21),
    )?;
    let Outcome::MissionClosed {
        stats: StatReport::Applied(record),
        ..
    } = outcome
    else {
        panic!("expected applied stats");
    };
    assert_eq!(record.history_index, 2);
    assert_eq!(record.after.health, 75);

    let ego: AlterEgo = read_json(fixture.roster.ego_path(Archetype::Kei))?;
    assert_eq!(ego.level, 2);
    assert_eq!(ego.xp_details.xp_to_next_level, Some(150));
    assert_eq!(ego.extra.get("quote"), Some(&json!("Still waters run deep")));

    let history: Vec<Value> = read_json(fixture.roster.history_path())?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["history_index"], json!(1));
    assert_eq!(history[0]["alter-ego"], json!("kei"));
    assert_eq!(history[0]["mission_associated"], json!("K01-meditate"));
    assert_eq!(history[0]["state"], json!("completed"));
    assert_eq!(history[0]["date"], json!("2025-01-20"));
    assert_eq!(history[1]["state"], json!("failed"));
    assert_eq!(history[1]["delta_changed"]["health"], json!(-10));

    Ok(())
}

#[sealed_test]
fn broken_alter_ego_keeps_mission_closed() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    fixture.track(Archetype::Kei, "not json", XP_RULES)?;
    fixture
        .ledger
        .create_mission(mission_draft(Archetype::Kei, "Meditate"))?;

    let outcome = dispatch(
        &fixture.ledger,
        &fixture.roster,
        Command::CompleteMission(code('K', 1)),
        date(2025, 1, 20),
    )?;
    let Outcome::MissionClosed { stats, closure } = outcome else {
        panic!("expected closed mission");
    };
    assert!(matches!(stats, StatReport::Failed(_)));
    assert_eq!(closure.mission.location.shelf, Shelf::Completed);
    assert!(fixture.exists(Shelf::Completed, "K01-meditate.json"));
    assert!(!fixture.roster.history_path().exists());

    Ok(())
}
