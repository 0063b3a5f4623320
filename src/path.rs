// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine where the data root and the configuration file live when the
//! operator does not say otherwise.

use std::path::PathBuf;

/// Determine default absolute path to the configuration file.
///
/// Uses XDG Base Directory path `$XDG_CONFIG_HOME/fight-club/config.toml` as
/// the default. Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if the configuration directory cannot be determined.
///
/// # See Also
///
/// - [XDG Base Directory](https://wiki.archlinux.org/title/XDG_Base_Directory)
pub fn default_config_file() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|path| path.join("fight-club").join("config.toml"))
        .ok_or(NoWayHome)
}

/// Determine default absolute path to the data root.
///
/// Missions and rewards live next to the blog content, so the data root
/// defaults to `gamification` under the current working directory.
///
/// # Errors
///
/// - Return [`NoWayHome`] if the current working directory cannot be read.
pub fn default_data_root() -> Result<PathBuf> {
    std::env::current_dir()
        .map(|path| path.join("gamification"))
        .map_err(|_| NoWayHome)
}

/// No way to determine where things should live.
///
/// # See Also
///
/// - [`dirs::config_dir`](https://docs.rs/dirs/latest/dirs/fn.config_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to configuration or data directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
