// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the optional configuration file to simplify the
//! process of serialization and deserialization. File I/O is left to the
//! caller to figure out, except for [`Config::load`] which treats a missing
//! file as "use the defaults".

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Default icon for missions when the operator gives none.
pub const DEFAULT_MISSION_ICON: &str = "assets/badges/default.png";

/// Default badge for rewards when the operator gives none.
pub const DEFAULT_BADGE_ICON: &str = "assets/rewards/default.png";

/// Configuration file layout.
///
/// # General Layout
///
/// The configuration is composed of two parts: settings and defaults. The
/// settings section says where the data root lives. The defaults section
/// supplies prefilled answers for prompts the operator usually skips.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub settings: Settings,

    /// Prefilled prompt answers.
    #[serde(default)]
    pub defaults: Defaults,
}

impl Config {
    /// Load configuration from target path.
    ///
    /// A missing file is not an error, it just means defaults everywhere.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if the file exists but cannot be read.
    /// - Return [`ConfigError::Deserialize`] if the file is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        read_to_string(path)
            .map_err(|err| ConfigError::Read {
                source: err,
                path: path.to_path_buf(),
            })?
            .parse()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: Config = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on data root field.
        if let Some(data_root) = config.settings.data_root.take() {
            config.settings.data_root = Some(DataRoot::new(
                shellexpand::full(data_root.to_string().as_str())
                    .map_err(ConfigError::ShellExpansion)?
                    .into_owned(),
            ));
        }

        Ok(config)
    }
}

impl Display for Config {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// General settings.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Directory holding the mission and reward shelves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_root: Option<DataRoot>,
}

/// Prefilled answers for prompts.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Icon path offered when creating a mission.
    #[serde(default = "default_mission_icon")]
    pub mission_icon: String,

    /// Badge path offered when creating a reward.
    #[serde(default = "default_badge_icon")]
    pub badge_icon: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            mission_icon: default_mission_icon(),
            badge_icon: default_badge_icon(),
        }
    }
}

fn default_mission_icon() -> String {
    DEFAULT_MISSION_ICON.into()
}

fn default_badge_icon() -> String {
    DEFAULT_BADGE_ICON.into()
}

/// Path acting as the data root.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct DataRoot(PathBuf);

impl DataRoot {
    /// Construct new data root.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Treat data root as [`Path`] slice.
    pub fn as_path(&self) -> &Path {
        self.0.as_path()
    }
}

impl Display for DataRoot {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_path().to_string_lossy().as_ref())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file exists but cannot be read.
    #[error("failed to read configuration at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
