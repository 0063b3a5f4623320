// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Mission and reward bookkeeping.
//!
//! The __ledger__ is the only place that changes documents. It knows which
//! shelf a document belongs on, how to name its file, and how to keep the
//! references between missions and rewards in agreement.
//!
//! # Two-Way Sync
//!
//! A mission caches a small copy of each reward it links, and a reward lists
//! the codes of every mission linking it. Both sides live in different files,
//! and there is no transaction spanning two files. Every operation that
//! touches both sides therefore follows a fixed order:
//!
//! - Creating, linking, unlinking, or unlocking writes the reward side first,
//!   then the mission side. If the process dies in between, the two sides
//!   disagree on one reference. Re-running the operation is safe, since
//!   association is a set insertion or removal and unlocking skips rewards
//!   that are already unlocked.
//! - Deleting removes the back-references first, then the document itself.
//!   If the process dies in between, the surviving documents simply no longer
//!   mention it, and re-running the delete finishes the job.
//!
//! All checks that can be made up front (missing documents, file name
//! conflicts, empty titles) are made before the first write. When a later
//! write fails anyway, the error is [`LedgerError::PartialSync`], which says
//! which side was already committed so the operator can reconcile by hand.
//!
//! # Moving Documents
//!
//! A document changes shelves or names by first writing its new content in
//! place, and then moving the file. Interruption between the two leaves the
//! new content under the old name, which the next operation on the same code
//! picks up as usual.

pub mod mission;
pub mod reward;

pub use mission::{Closure, MissionChanges, MissionCreated, MissionDraft, Revision, RewardPlan};
pub use reward::{RewardChanges, RewardDraft};

use crate::{
    model::{Code, Mission, Reward},
    store::{sequence::next_code, Entry, JsonStore, Location, Shelf, Storage, StoreError},
};

use tracing::debug;

/// Mission and reward operations over a document store.
#[derive(Debug, Clone)]
pub struct Ledger<S = JsonStore>
where
    S: Storage,
{
    store: S,
}

impl<S> Ledger<S>
where
    S: Storage,
{
    /// Construct new ledger.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Allocate fresh code over every document on target shelves.
    fn allocate(&self, shelves: &[Shelf], prefix: char) -> Result<Code> {
        let codes = self.store.codes(shelves, prefix)?;
        let code = next_code(prefix, &codes).ok_or_else(|| LedgerError::Validation {
            field: "code",
            reason: format!("no {prefix} codes left to allocate"),
        })?;
        debug!("allocate {code} over {} existing codes", codes.len());

        Ok(code)
    }

    /// Refuse to overwrite anything at target location.
    fn claim(&self, location: &Location) -> Result<()> {
        if self.store.exists(location) {
            return Err(LedgerError::Taken {
                location: location.clone(),
            });
        }

        Ok(())
    }

    /// Refuse to move a document onto an occupied location.
    fn claim_move(&self, from: &Location, to: &Location) -> Result<()> {
        if from == to {
            return Ok(());
        }

        self.claim(to)
    }

    /// Write document in place, then move it if its location changed.
    fn shelve<T>(&self, from: &Location, to: &Location, document: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        self.store.write(from, document)?;
        self.store.relocate(from, to)?;

        Ok(())
    }

    fn locate_mission(&self, code: &Code) -> Result<Option<Location>> {
        for shelf in Shelf::MISSIONS {
            if let Some(location) = self.store.locate(shelf, code)? {
                return Ok(Some(location));
            }
        }

        Ok(None)
    }

    fn locate_reward(&self, reward_id: &Code) -> Result<Option<Location>> {
        for shelf in Shelf::REWARDS {
            if let Some(location) = self.store.locate(shelf, reward_id)? {
                return Ok(Some(location));
            }
        }

        Ok(None)
    }

    /// Find mission on either shelf.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::MissionNotFound`] if no shelf holds the code.
    pub fn mission(&self, code: &Code) -> Result<Entry<Mission>> {
        let location = self
            .locate_mission(code)?
            .ok_or_else(|| LedgerError::MissionNotFound(code.clone()))?;
        let document = self.store.read(&location)?;

        Ok(Entry { location, document })
    }

    /// Every mission on a shelf.
    pub fn missions(&self, shelf: Shelf) -> Result<Vec<Entry<Mission>>> {
        Ok(self.store.list(shelf)?)
    }

    /// Find reward on either shelf.
    ///
    /// # Errors
    ///
    /// - Return [`LedgerError::RewardNotFound`] if no shelf holds the id.
    pub fn reward(&self, reward_id: &Code) -> Result<Entry<Reward>> {
        let location = self
            .locate_reward(reward_id)?
            .ok_or_else(|| LedgerError::RewardNotFound(reward_id.clone()))?;
        let document = self.store.read(&location)?;

        Ok(Entry { location, document })
    }

    /// Find mission, treating a missing one as absent rather than an error.
    fn mission_if_exists(&self, code: &Code) -> Result<Option<Entry<Mission>>> {
        match self.mission(code) {
            Ok(entry) => Ok(Some(entry)),
            Err(LedgerError::MissionNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Find reward, treating a missing one as absent rather than an error.
    fn reward_if_exists(&self, reward_id: &Code) -> Result<Option<Entry<Reward>>> {
        match self.reward(reward_id) {
            Ok(entry) => Ok(Some(entry)),
            Err(LedgerError::RewardNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Characters a title may not carry, since titles end up in file names.
const TITLE_SEPARATORS: [char; 3] = ['/', '\\', '\0'];

/// Require a non-blank title that stays a single file name once slugged.
pub(crate) fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(LedgerError::Validation {
            field: "title",
            reason: "title is required".into(),
        });
    }

    if title.contains(TITLE_SEPARATORS) {
        return Err(LedgerError::Validation {
            field: "title",
            reason: "title may not contain path separators".into(),
        });
    }

    Ok(())
}

/// Mark failure of a write that follows already committed writes.
fn after_commit<T, E>(committed: &[String], result: std::result::Result<T, E>) -> Result<T>
where
    E: Into<LedgerError>,
{
    result.map_err(|err| {
        let err = err.into();
        if committed.is_empty() {
            return err;
        }

        LedgerError::PartialSync {
            committed: committed.join("; "),
            source: Box::new(err),
        }
    })
}

/// Broad error categories shown to the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced mission or reward does not exist.
    NotFound,

    /// Target already exists, or the document is in the wrong state.
    Conflict,

    /// Input is malformed or out of range.
    Validation,

    /// Underlying file operation failed.
    Io,
}

/// Ledger error types.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// No mission carries the code.
    #[error("mission {0} not found")]
    MissionNotFound(Code),

    /// No reward carries the id.
    #[error("reward {0} not found")]
    RewardNotFound(Code),

    /// Operation needs an open mission, but it was already closed.
    #[error("mission {0} is already closed")]
    MissionClosed(Code),

    /// Target location is already occupied.
    #[error("{location} already exists")]
    Taken { location: Location },

    /// Input rejected.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A later write failed after earlier writes were committed.
    #[error("{committed}; but a later write failed, reconcile by hand")]
    PartialSync {
        committed: String,
        #[source]
        source: Box<LedgerError>,
    },

    /// Document storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Broad category of error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissionNotFound(_) | Self::RewardNotFound(_) => ErrorKind::NotFound,
            Self::MissionClosed(_) | Self::Taken { .. } => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::PartialSync { source, .. } => source.kind(),
            Self::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Store(StoreError::Conflict { .. }) => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Io,
        }
    }
}

/// Friendly result alias :3
pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
