// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Alter-ego mission tracker.
//!
//! Fight Club keeps a set of alter egos, each with its own missions. Finishing
//! a mission unlocks its rewards and moves the alter ego's stats. Everything
//! lives as plain JSON documents under a __data root__ that a separate web
//! front-end reads:
//!
//! ```text
//! <data root>/
//! ├── missions/
//! │   ├── not-completed/K01-meditate.json
//! │   └── completed/
//! ├── rewards/
//! │   ├── locked/R01-new-headphones.json
//! │   └── unlocked/
//! ├── alter-egoes/kei.json
//! ├── configs/xp-rules.json
//! └── history.json
//! ```
//!
//! Documents are only ever changed through the [`Ledger`](ledger::Ledger),
//! which keeps the references between missions and rewards in agreement.

pub mod command;
pub mod config;
pub mod ego;
pub mod ledger;
pub mod model;
pub mod path;
pub mod shell;
pub mod slug;
pub mod store;
