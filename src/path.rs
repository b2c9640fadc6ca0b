// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for the files that coderelay reads
//! and writes on the user's behalf. None of these functions check whether
//! the path returned actually exists.

use std::path::PathBuf;

/// Name of the directory coderelay keeps its configuration in.
pub const APP_DIR: &str = "coderelay";

/// File name of the preference file, and of the metadata stamp written into
/// every cloned project.
pub const PREFERENCES_FILE: &str = "coderelay.json";

/// File name of the optional settings file.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Determine absolute path to user's home directory.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Determine absolute path to coderelay's configuration directory.
///
/// Uses `$XDG_CONFIG_HOME/coderelay` on Linux, and the platform equivalent
/// everywhere else.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
///
/// # See Also
///
/// - [XDG Base Directory](https://wiki.archlinux.org/title/XDG_Base_Directory)
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|path| path.join(APP_DIR))
        .ok_or(NoWayHome)
}

/// Determine default absolute path to the preference file.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn default_preferences_path() -> Result<PathBuf> {
    config_dir().map(|path| path.join(PREFERENCES_FILE))
}

/// Determine default absolute path to the settings file.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn default_settings_path() -> Result<PathBuf> {
    config_dir().map(|path| path.join(SETTINGS_FILE))
}

/// Determine default absolute path that projects get cloned into.
///
/// Uses the user's documents directory, falling back to `~/Documents` when
/// the platform does not define one.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn default_projects_dir() -> Result<PathBuf> {
    let documents = match dirs::document_dir() {
        Some(path) => path,
        None => home_dir()?.join("Documents"),
    };

    Ok(documents.join("code-relay"))
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
