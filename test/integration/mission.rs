// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{code, date, mission_draft, reward_draft, DataRootFixture};

use fight_club::{
    ledger::{ErrorKind, LedgerError, MissionChanges, RewardPlan},
    model::{Archetype, Status},
    store::Shelf,
};

use anyhow::Result;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use serde_json::{json, Value};

#[sealed_test]
fn create_mission_names_file_after_code_and_title() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let created = fixture
        .ledger
        .create_mission(mission_draft(Archetype::Kei, "Meditate"))?;

    assert_eq!(created.mission.location.file_name, "K01-meditate.json");
    assert_eq!(created.mission.location.shelf, Shelf::NotCompleted);
    assert_eq!(created.reward, None);

    let raw = fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?;
    assert_eq!(raw["archetype"], json!("kei"));
    assert_eq!(raw["mission_code"], json!("K01"));
    assert_eq!(raw["status"], json!("not-started"));
    assert_eq!(raw["progress"], json!({ "current": 0, "total": 5 }));
    assert_eq!(raw["reward"], json!([]));
    assert_eq!(raw["completion_date"], Value::Null);

    Ok(())
}

#[sealed_test]
fn codes_continue_from_highest_on_either_shelf() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    ledger.create_mission(mission_draft(Archetype::Kei, "Journal"))?;
    ledger.complete_mission(&code('K', 2), date(2025, 1, 10))?;
    ledger.delete_mission(&code('K', 1))?;

    let kei = ledger.create_mission(mission_draft(Archetype::Kei, "Stretch"))?;
    let robot = ledger.create_mission(mission_draft(Archetype::MrRobot, "Refactor"))?;
    assert_eq!(kei.mission.document.mission_code, code('K', 3));
    assert_eq!(robot.mission.document.mission_code, code('M', 1));
    assert_eq!(
        fixture.file_names(Shelf::NotCompleted)?,
        vec!["K03-stretch.json", "M01-refactor.json"]
    );

    Ok(())
}

#[sealed_test]
fn create_mission_rejects_blank_title_before_writing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let result = fixture
        .ledger
        .create_mission(mission_draft(Archetype::Tyler, "   "));

    assert!(matches!(result, Err(LedgerError::Validation { field: "title", .. })));
    assert!(fixture.file_names(Shelf::NotCompleted)?.is_empty());

    Ok(())
}

#[sealed_test]
fn create_mission_rejects_path_separator_in_title_before_writing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Kei, "Read 1/2 Book");
    draft.reward = RewardPlan::Create(reward_draft("Coffee"));
    let result = ledger.create_mission(draft);
    assert!(matches!(result, Err(LedgerError::Validation { field: "title", .. })));

    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("Coffee\\Tea"));
    let result = ledger.create_mission(draft);
    assert!(matches!(result, Err(LedgerError::Validation { field: "title", .. })));

    for shelf in Shelf::ALL {
        assert!(fixture.file_names(shelf)?.is_empty());
    }

    // Codes stay free for the next well-formed mission.
    let created = ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    assert_eq!(created.mission.document.mission_code, code('K', 1));
    assert!(created.mission.document.reward.is_empty());

    Ok(())
}

#[sealed_test]
fn create_mission_with_missing_reward_writes_nothing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Link(code('R', 9));
    let result = fixture.ledger.create_mission(draft);

    assert!(matches!(result, Err(LedgerError::RewardNotFound(_))));
    assert!(fixture.file_names(Shelf::NotCompleted)?.is_empty());

    Ok(())
}

#[sealed_test]
fn create_mission_with_fresh_reward_links_both_sides() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("New Headphones"));
    let created = fixture.ledger.create_mission(draft)?;

    let reward = created.reward.expect("reward was created");
    assert_eq!(reward.reward_id, code('R', 1));
    assert_eq!(reward.associated_mission_ids, vec![code('K', 1)]);
    assert!(reward.is_locked);
    assert_eq!(created.mission.document.reward, vec![reward.to_ref()]);

    let raw = fixture.raw(Shelf::Locked, "R01-new-headphones.json")?;
    assert_eq!(raw["associated_mission_ids"], json!(["K01"]));
    assert_eq!(raw["is_locked"], json!(true));

    Ok(())
}

#[sealed_test]
fn create_mission_links_existing_reward() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_reward(reward_draft("Movie Night"))?;

    let mut draft = mission_draft(Archetype::Tyler, "Run 5k");
    draft.reward = RewardPlan::Link(code('R', 1));
    let created = ledger.create_mission(draft)?;

    assert_eq!(created.mission.location.file_name, "T01-run-5k.json");
    let reward = ledger.reward(&code('R', 1))?.document;
    assert_eq!(reward.associated_mission_ids, vec![code('T', 1)]);
    assert!(created.mission.document.links(&code('R', 1)));

    Ok(())
}

#[sealed_test]
fn update_progress_moves_status_along() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    let kei = code('K', 1);

    let entry = ledger.update_progress(&kei, 3)?;
    assert_eq!(entry.document.status, Status::InProgress);
    assert_eq!(entry.document.progress.percent(), 60);

    // Reaching the total keeps the mission open.
    let entry = ledger.update_progress(&kei, 5)?;
    assert_eq!(entry.document.status, Status::InProgress);
    assert_eq!(entry.location.shelf, Shelf::NotCompleted);

    let entry = ledger.update_progress(&kei, 0)?;
    assert_eq!(entry.document.status, Status::NotStarted);

    let raw = fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?;
    assert_eq!(raw["progress"], json!({ "current": 0, "total": 5 }));

    Ok(())
}

#[sealed_test]
fn complete_mission_unlocks_linked_rewards() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_reward(reward_draft("Movie Night"))?;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("New Headphones"));
    ledger.create_mission(draft)?;

    let closure = ledger.complete_mission(&code('K', 1), date(2025, 1, 20))?;
    assert_eq!(closure.mission.location.shelf, Shelf::Completed);
    assert_eq!(closure.mission.document.status, Status::Completed);
    assert_eq!(closure.mission.document.completion_date, Some(date(2025, 1, 20)));
    assert_eq!(closure.mission.document.progress.current, 5);
    assert_eq!(
        closure.stat_change,
        closure.mission.document.archetype_stat_change.on_complete
    );
    assert_eq!(
        closure
            .unlocked
            .iter()
            .map(|reward| reward.reward_id.clone())
            .collect::<Vec<_>>(),
        vec![code('R', 2)]
    );

    assert!(!fixture.exists(Shelf::NotCompleted, "K01-meditate.json"));
    assert!(fixture.exists(Shelf::Completed, "K01-meditate.json"));
    assert!(!fixture.exists(Shelf::Locked, "R02-new-headphones.json"));
    let raw = fixture.raw(Shelf::Unlocked, "R02-new-headphones.json")?;
    assert_eq!(raw["is_locked"], json!(false));
    assert!(fixture.exists(Shelf::Locked, "R01-movie-night.json"));

    Ok(())
}

#[sealed_test]
fn complete_mission_skips_rewards_already_unlocked() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut first = mission_draft(Archetype::Kei, "Meditate");
    first.reward = RewardPlan::Create(reward_draft("Spa Day"));
    ledger.create_mission(first)?;
    let mut second = mission_draft(Archetype::Kei, "Journal");
    second.reward = RewardPlan::Link(code('R', 1));
    ledger.create_mission(second)?;

    let closure = ledger.complete_mission(&code('K', 1), date(2025, 1, 20))?;
    assert_eq!(closure.unlocked.len(), 1);

    let closure = ledger.complete_mission(&code('K', 2), date(2025, 1, 21))?;
    assert!(closure.unlocked.is_empty());
    assert_eq!(closure.skipped, vec![code('R', 1)]);
    assert_eq!(fixture.file_names(Shelf::Unlocked)?, vec!["R01-spa-day.json"]);
    assert!(fixture.file_names(Shelf::Locked)?.is_empty());

    Ok(())
}

#[sealed_test]
fn fail_mission_keeps_rewards_locked() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Tyler, "Cold Shower");
    draft.reward = RewardPlan::Create(reward_draft("Sauna"));
    ledger.create_mission(draft)?;

    let closure = ledger.fail_mission(&code('T', 1), date(2025, 2, 1))?;
    assert_eq!(closure.mission.document.status, Status::Failed);
    assert_eq!(closure.mission.document.progress.current, 0);
    assert_eq!(
        closure.stat_change,
        closure.mission.document.archetype_stat_change.on_failure
    );
    assert!(closure.unlocked.is_empty());
    assert!(fixture.exists(Shelf::Completed, "T01-cold-shower.json"));
    assert!(fixture.exists(Shelf::Locked, "R01-sauna.json"));

    Ok(())
}

#[sealed_test]
fn closed_missions_reject_progress_and_closing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    let kei = code('K', 1);
    ledger.complete_mission(&kei, date(2025, 1, 20))?;

    let result = ledger.complete_mission(&kei, date(2025, 1, 21));
    assert!(matches!(result, Err(LedgerError::MissionClosed(_))));
    let result = ledger.fail_mission(&kei, date(2025, 1, 21));
    assert!(matches!(result, Err(LedgerError::MissionClosed(_))));
    let result = ledger.update_progress(&kei, 1);
    assert_eq!(result.map_err(|err| err.kind()).err(), Some(ErrorKind::Conflict));

    let result = ledger.complete_mission(&code('K', 7), date(2025, 1, 21));
    assert!(matches!(result, Err(LedgerError::MissionNotFound(_))));

    Ok(())
}

#[sealed_test]
fn modify_title_renames_file_and_keeps_everything_else() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    let mut expect = fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?;

    let changes = MissionChanges {
        title: Some("Deep Meditation".into()),
        ..Default::default()
    };
    let revision = ledger.modify_mission(&code('K', 1), changes, date(2025, 1, 5))?;
    assert_eq!(revision.previous.file_name, "K01-meditate.json");
    assert_eq!(revision.mission.location.file_name, "K01-deep-meditation.json");
    assert_eq!(
        fixture.file_names(Shelf::NotCompleted)?,
        vec!["K01-deep-meditation.json"]
    );

    expect["title"] = json!("Deep Meditation");
    let result = fixture.raw(Shelf::NotCompleted, "K01-deep-meditation.json")?;
    assert_eq!(result, expect);

    Ok(())
}

#[sealed_test]
fn modify_progress_without_status_derives_status() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::MrRobot, "Refactor"))?;

    let changes = MissionChanges {
        current: Some(2),
        total: Some(10),
        ..Default::default()
    };
    let revision = ledger.modify_mission(&code('M', 1), changes, date(2025, 1, 5))?;
    assert_eq!(revision.mission.document.status, Status::InProgress);
    assert_eq!(revision.mission.document.progress.total, 10);

    Ok(())
}

#[sealed_test]
fn modify_status_moves_between_shelves() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("Spa Day"));
    ledger.create_mission(draft)?;
    let kei = code('K', 1);

    let changes = MissionChanges {
        status: Some(Status::Completed),
        ..Default::default()
    };
    let revision = ledger.modify_mission(&kei, changes, date(2025, 1, 9))?;
    assert_eq!(revision.mission.location.shelf, Shelf::Completed);
    assert_eq!(revision.mission.document.completion_date, Some(date(2025, 1, 9)));
    assert_eq!(revision.unlocked.len(), 1);
    assert!(fixture.exists(Shelf::Unlocked, "R01-spa-day.json"));

    let changes = MissionChanges {
        status: Some(Status::InProgress),
        ..Default::default()
    };
    let revision = ledger.modify_mission(&kei, changes, date(2025, 1, 10))?;
    assert_eq!(revision.previous.shelf, Shelf::Completed);
    assert_eq!(revision.mission.location.shelf, Shelf::NotCompleted);
    assert_eq!(revision.mission.document.completion_date, None);
    assert!(revision.unlocked.is_empty());

    // Unlocked rewards stay unlocked after reopening.
    assert!(fixture.exists(Shelf::Unlocked, "R01-spa-day.json"));

    Ok(())
}

#[sealed_test]
fn modify_links_and_unlinks_rewards_on_both_sides() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("Spa Day"));
    ledger.create_mission(draft)?;
    ledger.create_reward(reward_draft("Movie Night"))?;
    let kei = code('K', 1);

    let changes = MissionChanges {
        link: vec![code('R', 2)],
        unlink: vec![code('R', 1)],
        new_reward: Some(reward_draft("Sushi")),
        ..Default::default()
    };
    let revision = ledger.modify_mission(&kei, changes, date(2025, 1, 5))?;
    let result = revision
        .mission
        .document
        .reward
        .iter()
        .map(|link| link.reward_id.clone())
        .collect::<Vec<_>>();
    assert_eq!(result, vec![code('R', 2), code('R', 3)]);

    let spa = ledger.reward(&code('R', 1))?.document;
    let movie = ledger.reward(&code('R', 2))?.document;
    let sushi = ledger.reward(&code('R', 3))?.document;
    assert!(spa.associated_mission_ids.is_empty());
    assert_eq!(movie.associated_mission_ids, vec![kei.clone()]);
    assert_eq!(sushi.associated_mission_ids, vec![kei]);

    Ok(())
}

#[sealed_test]
fn modify_onto_taken_name_is_rejected() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    let blocker = fixture.path(Shelf::NotCompleted, "K01-journal.json");
    std::fs::write(&blocker, "{}")?;

    let changes = MissionChanges {
        title: Some("Journal".into()),
        ..Default::default()
    };
    let result = ledger.modify_mission(&code('K', 1), changes, date(2025, 1, 5));
    assert!(matches!(result, Err(LedgerError::Taken { .. })));
    assert!(fixture.exists(Shelf::NotCompleted, "K01-meditate.json"));

    Ok(())
}

#[sealed_test]
fn modify_rejects_path_separator_in_title_before_writing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    let before = fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?;

    let changes = MissionChanges {
        title: Some("Read 1/2 Book".into()),
        new_reward: Some(reward_draft("Coffee")),
        ..Default::default()
    };
    let result = ledger.modify_mission(&code('K', 1), changes, date(2025, 1, 5));
    assert!(matches!(result, Err(LedgerError::Validation { field: "title", .. })));

    let changes = MissionChanges {
        new_reward: Some(reward_draft("Coffee/Tea")),
        ..Default::default()
    };
    let result = ledger.modify_mission(&code('K', 1), changes, date(2025, 1, 5));
    assert!(matches!(result, Err(LedgerError::Validation { field: "title", .. })));

    assert_eq!(fixture.file_names(Shelf::NotCompleted)?, vec!["K01-meditate.json"]);
    assert_eq!(fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?, before);
    assert!(fixture.file_names(Shelf::Locked)?.is_empty());

    Ok(())
}

#[sealed_test]
fn delete_mission_strips_reward_back_references() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("Spa Day"));
    ledger.create_mission(draft)?;
    let mut draft = mission_draft(Archetype::Kei, "Journal");
    draft.reward = RewardPlan::Link(code('R', 1));
    ledger.create_mission(draft)?;

    let deleted = ledger.delete_mission(&code('K', 1))?;
    assert_eq!(deleted.title, "Meditate");
    assert!(!fixture.exists(Shelf::NotCompleted, "K01-meditate.json"));

    let reward = ledger.reward(&code('R', 1))?.document;
    assert_eq!(reward.associated_mission_ids, vec![code('K', 2)]);

    let result = ledger.delete_mission(&code('K', 1));
    assert!(matches!(result, Err(LedgerError::MissionNotFound(_))));

    Ok(())
}
