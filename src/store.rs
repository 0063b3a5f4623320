// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Document storage.
//!
//! Every mission and reward is one JSON document in one of four directories
//! called __shelves__, all under a single __data root__.
//!
//! # Data Root Layout
//!
//! ```text
//! missions/not-completed/{CODE}-{slug}.json
//! missions/completed/{CODE}-{slug}.json
//! rewards/locked/{RID}-{slug}.json
//! rewards/unlocked/{RID}-{slug}.json
//! ```
//!
//! Only the top-level of each shelf is evaluated. Anything that does not end
//! in ".json" is ignored, which includes the temporary files used for
//! atomic writes.
//!
//! # Atomic Writes
//!
//! Documents are never written in place. The new content goes to a sibling
//! temporary file first, which is then renamed over the target. An interrupted
//! write leaves either the old document or the new one, never half of each.

pub mod sequence;

use crate::model::Code;

use glob::Pattern;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::{read_to_string, remove_file, rename, write},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

/// Directory holding one kind of document in one state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shelf {
    /// Missions that are not started or in progress.
    NotCompleted,

    /// Missions that were completed or failed.
    Completed,

    /// Rewards still waiting on a mission.
    Locked,

    /// Rewards that have been earned.
    Unlocked,
}

impl Shelf {
    /// Every mission shelf.
    pub const MISSIONS: [Shelf; 2] = [Shelf::NotCompleted, Shelf::Completed];

    /// Every reward shelf.
    pub const REWARDS: [Shelf; 2] = [Shelf::Locked, Shelf::Unlocked];

    /// Every shelf.
    pub const ALL: [Shelf; 4] = [
        Shelf::NotCompleted,
        Shelf::Completed,
        Shelf::Locked,
        Shelf::Unlocked,
    ];

    /// Path of shelf relative to data root.
    pub fn relative_path(self) -> PathBuf {
        match self {
            Self::NotCompleted => Path::new("missions").join("not-completed"),
            Self::Completed => Path::new("missions").join("completed"),
            Self::Locked => Path::new("rewards").join("locked"),
            Self::Unlocked => Path::new("rewards").join("unlocked"),
        }
    }

    /// Mission shelf matching a closed or open state.
    pub fn for_mission(closed: bool) -> Self {
        if closed {
            Self::Completed
        } else {
            Self::NotCompleted
        }
    }

    /// Reward shelf matching a lock state.
    pub fn for_reward(is_locked: bool) -> Self {
        if is_locked {
            Self::Locked
        } else {
            Self::Unlocked
        }
    }
}

impl Display for Shelf {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::NotCompleted => "not-completed",
            Self::Completed => "completed",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
        })
    }
}

/// Address of a document relative to the data root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub shelf: Shelf,
    pub file_name: String,
}

impl Location {
    /// Construct new location.
    pub fn new(shelf: Shelf, file_name: impl Into<String>) -> Self {
        Self {
            shelf,
            file_name: file_name.into(),
        }
    }

    /// File name without the ".json" extension.
    pub fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(".json")
            .unwrap_or(&self.file_name)
    }
}

impl Display for Location {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(
            fmt,
            "{}",
            self.shelf.relative_path().join(&self.file_name).display()
        )
    }
}

/// Document paired with where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<T> {
    pub location: Location,
    pub document: T,
}

/// Layer of indirection for document storage.
pub trait Storage {
    /// Read document at location.
    fn read<T: DeserializeOwned>(&self, location: &Location) -> Result<T>;

    /// Atomically create or overwrite document at location.
    fn write<T: Serialize>(&self, location: &Location, document: &T) -> Result<()>;

    /// Check if a document exists at location.
    fn exists(&self, location: &Location) -> bool;

    /// Move document to a new location, refusing to clobber.
    fn relocate(&self, from: &Location, to: &Location) -> Result<()>;

    /// Delete document at location.
    fn remove(&self, location: &Location) -> Result<()>;

    /// Read every document on a shelf, sorted by file name.
    fn list<T: DeserializeOwned>(&self, shelf: Shelf) -> Result<Vec<Entry<T>>>;

    /// Find the document carrying a code on a shelf.
    fn locate(&self, shelf: Shelf, code: &Code) -> Result<Option<Location>>;

    /// Gather every code with target prefix embedded in file names on shelves.
    fn codes(&self, shelves: &[Shelf], prefix: char) -> Result<Vec<Code>>;
}

/// Document storage on the local file system.
#[derive(Clone, Debug)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Open store at data root.
    ///
    /// Creates every shelf directory that does not exist yet.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::CreateShelf`] if a shelf cannot be created.
    #[instrument(skip(root), level = "debug")]
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        debug!("open data root: {:?}", root.display());
        for shelf in Shelf::ALL {
            let path = root.join(shelf.relative_path());
            mkdirp::mkdirp(&path).map_err(|err| StoreError::CreateShelf {
                source: err,
                path: path.clone(),
            })?;
        }

        Ok(Self { root })
    }

    /// Path of data root.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Absolute path of a location.
    pub fn path_of(&self, location: &Location) -> PathBuf {
        self.shelf_path(location.shelf).join(&location.file_name)
    }

    fn shelf_path(&self, shelf: Shelf) -> PathBuf {
        self.root.join(shelf.relative_path())
    }

    fn shelf_files(&self, shelf: Shelf, pattern: &str) -> Result<Vec<PathBuf>> {
        let dir = self.shelf_path(shelf);
        let pattern = format!(
            "{}/{}",
            Pattern::escape(dir.to_string_lossy().as_ref()),
            pattern
        );

        let mut paths = glob::glob(&pattern)?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|path| path.is_file())
            .collect::<Vec<_>>();
        paths.sort();

        Ok(paths)
    }
}

impl Storage for JsonStore {
    fn read<T: DeserializeOwned>(&self, location: &Location) -> Result<T> {
        read_json(self.path_of(location))
    }

    #[instrument(skip(self, document), level = "debug")]
    fn write<T: Serialize>(&self, location: &Location, document: &T) -> Result<()> {
        write_json(self.path_of(location), document)
    }

    fn exists(&self, location: &Location) -> bool {
        self.path_of(location).is_file()
    }

    #[instrument(skip(self), level = "debug")]
    fn relocate(&self, from: &Location, to: &Location) -> Result<()> {
        if from == to {
            return Ok(());
        }

        let source = self.path_of(from);
        let target = self.path_of(to);
        if !source.is_file() {
            return Err(StoreError::NotFound { path: source });
        }

        if target.exists() {
            return Err(StoreError::Conflict { path: target });
        }

        debug!("move {from} to {to}");
        rename(&source, &target).map_err(|err| StoreError::Rename {
            source: err,
            from: source.clone(),
            to: target.clone(),
        })
    }

    #[instrument(skip(self), level = "debug")]
    fn remove(&self, location: &Location) -> Result<()> {
        let path = self.path_of(location);
        if !path.is_file() {
            return Err(StoreError::NotFound { path });
        }

        remove_file(&path).map_err(|err| StoreError::Remove { source: err, path })
    }

    fn list<T: DeserializeOwned>(&self, shelf: Shelf) -> Result<Vec<Entry<T>>> {
        self.shelf_files(shelf, "*.json")?
            .into_iter()
            .filter_map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .map(|name| (path, name))
            })
            .map(|(path, file_name)| {
                Ok(Entry {
                    document: read_json(&path)?,
                    location: Location::new(shelf, file_name),
                })
            })
            .collect()
    }

    fn locate(&self, shelf: Shelf, code: &Code) -> Result<Option<Location>> {
        let mut found = self
            .shelf_files(shelf, &format!("{code}-*.json"))?
            .into_iter()
            .filter_map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .collect::<Vec<_>>();

        if found.len() > 1 {
            warn!("{code} has {} documents on {shelf} shelf, using first", found.len());
        }

        if found.is_empty() {
            return Ok(None);
        }

        Ok(Some(Location::new(shelf, found.remove(0))))
    }

    fn codes(&self, shelves: &[Shelf], prefix: char) -> Result<Vec<Code>> {
        let prefix = prefix.to_ascii_uppercase();
        let mut codes = Vec::new();
        for shelf in shelves {
            for path in self.shelf_files(*shelf, "*.json")? {
                let code = path
                    .file_name()
                    .and_then(|name| Code::from_file_name(name.to_string_lossy()));
                if let Some(code) = code.filter(|code| code.prefix() == prefix) {
                    codes.push(code);
                }
            }
        }

        Ok(codes)
    }
}

/// Read JSON document from path.
///
/// # Errors
///
/// - Return [`StoreError::NotFound`] if nothing exists at path.
/// - Return [`StoreError::Read`] if the file cannot be read.
/// - Return [`StoreError::Deserialize`] if the content is not the expected
///   document.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(StoreError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = read_to_string(path).map_err(|err| StoreError::Read {
        source: err,
        path: path.to_path_buf(),
    })?;

    serde_json::from_str(&content).map_err(|err| StoreError::Deserialize {
        source: err,
        path: path.to_path_buf(),
    })
}

/// Atomically write JSON document to path.
///
/// Documents are pretty printed with a four space indent.
///
/// # Errors
///
/// - Return [`StoreError::Serialize`] if the document cannot be serialized.
/// - Return [`StoreError::Write`] if the temporary file cannot be written.
/// - Return [`StoreError::Rename`] if the temporary file cannot replace the
///   target.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, document: &T) -> Result<()> {
    let path = path.as_ref();
    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|err| StoreError::Serialize {
            source: err,
            path: path.to_path_buf(),
        })?;

    // INVARIANT: Never expose a partially written document.
    //   - Write full content to a sibling first.
    //   - Swap the sibling in with a single rename.
    let staging = path.with_extension("tmp");
    write(&staging, &content).map_err(|err| StoreError::Write {
        source: err,
        path: staging.clone(),
    })?;

    rename(&staging, path).map_err(|err| {
        let _ = remove_file(&staging);
        StoreError::Rename {
            source: err,
            from: staging.clone(),
            to: path.to_path_buf(),
        }
    })
}

/// Document storage error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document does not exist.
    #[error("no document at {:?}", path.display())]
    NotFound { path: PathBuf },

    /// Target of a move or create is already taken.
    #[error("document already exists at {:?}", path.display())]
    Conflict { path: PathBuf },

    /// Shelf directory cannot be created.
    #[error("failed to create shelf at {:?}", path.display())]
    CreateShelf {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Document cannot be read from.
    #[error("failed to read document at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Document cannot be written to.
    #[error("failed to write document at {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Document cannot be moved.
    #[error("failed to move document from {:?} to {:?}", from.display(), to.display())]
    Rename {
        #[source]
        source: std::io::Error,
        from: PathBuf,
        to: PathBuf,
    },

    /// Document cannot be deleted.
    #[error("failed to remove document at {:?}", path.display())]
    Remove {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Document content is malformed.
    #[error("malformed document at {:?}", path.display())]
    Deserialize {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },

    /// Document cannot be turned into JSON.
    #[error("failed to serialize document for {:?}", path.display())]
    Serialize {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },

    /// Shelf path cannot be turned into a file pattern.
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// Shelf entry cannot be inspected.
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
}

/// Friendly result alias :3
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
