// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{code, mission_draft, reward_draft, DataRootFixture};

use fight_club::{
    ledger::{LedgerError, RewardChanges, RewardPlan},
    model::{Archetype, Reward, RewardType},
    store::{Location, Shelf, Storage},
};

use anyhow::Result;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use serde_json::json;

#[sealed_test]
fn create_reward_for_mission_links_both_sides() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;

    let mut draft = reward_draft("New Headphones");
    draft.mission = Some(code('K', 1));
    let entry = ledger.create_reward(draft)?;
    assert_eq!(entry.location.file_name, "R01-new-headphones.json");
    assert_eq!(entry.location.shelf, Shelf::Locked);

    let raw = fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?;
    assert_eq!(
        raw["reward"],
        json!([{ "reward_type": "rare", "title": "New Headphones", "reward_id": "R01" }])
    );

    Ok(())
}

#[sealed_test]
fn create_reward_for_missing_mission_writes_nothing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let mut draft = reward_draft("New Headphones");
    draft.mission = Some(code('K', 4));
    let result = fixture.ledger.create_reward(draft);

    assert!(matches!(result, Err(LedgerError::MissionNotFound(_))));
    assert!(fixture.file_names(Shelf::Locked)?.is_empty());

    Ok(())
}

#[sealed_test]
fn create_reward_rejects_path_separator_in_title_before_writing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_mission(mission_draft(Archetype::Kei, "Meditate"))?;
    let before = fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?;

    let mut draft = reward_draft("Half/Day Off");
    draft.mission = Some(code('K', 1));
    let result = ledger.create_reward(draft);

    assert!(matches!(result, Err(LedgerError::Validation { field: "title", .. })));
    assert!(fixture.file_names(Shelf::Locked)?.is_empty());
    assert_eq!(fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?, before);

    Ok(())
}

#[sealed_test]
fn reward_ids_count_both_shelves() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Tyler, "Run 5k");
    draft.reward = RewardPlan::Create(reward_draft("Sauna"));
    ledger.create_mission(draft)?;
    ledger.complete_mission(&code('T', 1), crate::date(2025, 3, 1))?;

    let entry = ledger.create_reward(reward_draft("Movie Night"))?;
    assert_eq!(entry.document.reward_id, code('R', 2));

    let locked = ledger.rewards(Shelf::Locked)?;
    let unlocked = ledger.rewards(Shelf::Unlocked)?;
    assert_eq!(locked.len(), 1);
    assert_eq!(locked[0].title, "Movie Night");
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].associated_mission_ids, vec![code('T', 1)]);

    Ok(())
}

#[sealed_test]
fn modify_reward_renames_file_and_refreshes_mission_cache() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("Headphones"));
    ledger.create_mission(draft)?;

    let changes = RewardChanges {
        title: Some("Noise Cancelling Headphones".into()),
        reward_type: Some(RewardType::Epic),
        ..Default::default()
    };
    let entry = ledger.modify_reward(&code('R', 1), changes)?;
    assert_eq!(
        entry.location.file_name,
        "R01-noise-cancelling-headphones.json"
    );
    assert_eq!(
        fixture.file_names(Shelf::Locked)?,
        vec!["R01-noise-cancelling-headphones.json"]
    );

    let mission = ledger.mission(&code('K', 1))?.document;
    assert_eq!(mission.reward, vec![entry.document.to_ref()]);
    assert_eq!(mission.reward[0].reward_type, RewardType::Epic);

    Ok(())
}

#[sealed_test]
fn modify_reward_moves_associations() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("Spa Day"));
    ledger.create_mission(draft)?;
    ledger.create_mission(mission_draft(Archetype::MrRobot, "Refactor"))?;

    let changes = RewardChanges {
        associate: vec![code('M', 1)],
        dissociate: vec![code('K', 1)],
        ..Default::default()
    };
    let entry = ledger.modify_reward(&code('R', 1), changes)?;
    assert_eq!(entry.document.associated_mission_ids, vec![code('M', 1)]);

    let kei = ledger.mission(&code('K', 1))?.document;
    let robot = ledger.mission(&code('M', 1))?.document;
    assert!(kei.reward.is_empty());
    assert!(robot.links(&code('R', 1)));

    Ok(())
}

#[sealed_test]
fn modify_reward_with_missing_mission_changes_nothing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_reward(reward_draft("Spa Day"))?;
    let before = fixture.raw(Shelf::Locked, "R01-spa-day.json")?;

    let changes = RewardChanges {
        title: Some("Spa Weekend".into()),
        associate: vec![code('K', 3)],
        ..Default::default()
    };
    let result = ledger.modify_reward(&code('R', 1), changes);
    assert!(matches!(result, Err(LedgerError::MissionNotFound(_))));
    assert_eq!(fixture.raw(Shelf::Locked, "R01-spa-day.json")?, before);

    Ok(())
}

#[sealed_test]
fn modify_reward_rejects_path_separator_in_title_before_writing() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let mut draft = mission_draft(Archetype::Kei, "Meditate");
    draft.reward = RewardPlan::Create(reward_draft("Spa Day"));
    ledger.create_mission(draft)?;
    let reward = fixture.raw(Shelf::Locked, "R01-spa-day.json")?;
    let mission = fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?;

    let changes = RewardChanges {
        title: Some("Spa\\Sauna".into()),
        reward_type: Some(RewardType::Epic),
        ..Default::default()
    };
    let result = ledger.modify_reward(&code('R', 1), changes);

    assert!(matches!(result, Err(LedgerError::Validation { field: "title", .. })));
    assert_eq!(fixture.file_names(Shelf::Locked)?, vec!["R01-spa-day.json"]);
    assert_eq!(fixture.raw(Shelf::Locked, "R01-spa-day.json")?, reward);
    assert_eq!(fixture.raw(Shelf::NotCompleted, "K01-meditate.json")?, mission);

    Ok(())
}

#[sealed_test]
fn delete_reward_strips_references_from_every_mission() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    ledger.create_reward(reward_draft("Movie Night"))?;
    ledger.create_reward(reward_draft("Spa Day"))?;
    let mut draft = mission_draft(Archetype::MrRobot, "Refactor");
    draft.reward = RewardPlan::Create(reward_draft("Mechanical Keyboard"));
    ledger.create_mission(draft)?;
    let mut draft = mission_draft(Archetype::MrRobot, "Ship Release");
    draft.reward = RewardPlan::Link(code('R', 3));
    ledger.create_mission(draft)?;

    let mut first = fixture.raw(Shelf::NotCompleted, "M01-refactor.json")?;
    let mut second = fixture.raw(Shelf::NotCompleted, "M02-ship-release.json")?;

    let deleted = ledger.delete_reward(&code('R', 3))?;
    assert_eq!(deleted.associated_mission_ids, vec![code('M', 1), code('M', 2)]);
    assert_eq!(
        fixture.file_names(Shelf::Locked)?,
        vec!["R01-movie-night.json", "R02-spa-day.json"]
    );

    first["reward"] = json!([]);
    second["reward"] = json!([]);
    assert_eq!(fixture.raw(Shelf::NotCompleted, "M01-refactor.json")?, first);
    assert_eq!(
        fixture.raw(Shelf::NotCompleted, "M02-ship-release.json")?,
        second
    );

    Ok(())
}

#[sealed_test]
fn delete_reward_tolerates_missing_missions() -> Result<()> {
    let fixture = DataRootFixture::new()?;
    let ledger = &fixture.ledger;
    let reward = Reward {
        reward_id: code('R', 1),
        title: "Spa Day".into(),
        description: String::new(),
        associated_mission_ids: vec![code('K', 9)],
        reward_type: RewardType::Common,
        is_locked: true,
        badge_icon: String::new(),
    };
    ledger
        .store()
        .write(&Location::new(Shelf::Locked, reward.file_name()), &reward)?;

    let deleted = ledger.delete_reward(&code('R', 1))?;
    assert_eq!(deleted, reward);
    assert!(fixture.file_names(Shelf::Locked)?.is_empty());

    let result = ledger.delete_reward(&code('R', 1));
    assert!(matches!(result, Err(LedgerError::RewardNotFound(_))));

    Ok(())
}
