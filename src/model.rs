// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Document layouts.
//!
//! Missions and rewards are stored as plain JSON documents that a separate
//! web front-end also reads. Field names, nesting, and enum spellings are
//! therefore part of a contract, and the types here only exist to make that
//! contract hard to get wrong from Rust.
//!
//! # Missions
//!
//! A [`Mission`] belongs to one [`Archetype`] and is identified by a [`Code`]
//! whose prefix is the archetype's letter, e.g., `K01` for Kei. Its
//! [`Status`] decides which shelf holds its file.
//!
//! # Rewards
//!
//! A [`Reward`] is identified by an `R` prefixed [`Code`]. Missions keep a
//! small cached copy of each linked reward as a [`RewardRef`], and each reward
//! lists the codes of the missions that link it. Keeping both sides in
//! agreement is the job of [`Ledger`](crate::ledger::Ledger).

pub mod archetype;
pub mod code;
pub mod mission;
pub mod reward;

pub use archetype::Archetype;
pub use code::{Code, CodeError};
pub use mission::{ArchetypeStatChange, Difficulty, Mission, Progress, StatChange, Status};
pub use reward::{Reward, RewardRef, RewardType, RewardView};
