// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout for configuration files that coderelay uses to simplify
//! the process of serialization and deserialization. File I/O is left to the
//! caller to figure out.

use crate::path::{default_projects_dir, NoWayHome};

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::PathBuf,
    str::FromStr,
};

/// Canonical feed of available projects, served as a plain JSON array.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/KTibow/code-relay/main/data/available_projects.json";

/// User preference layout.
///
/// Preferences decide how each project in the feed gets classified. All
/// identifiers are slug-like, based on the full name of the language or
/// framework, e.g., "Tailwind CSS" becomes "tailwindcss".
///
/// # General Layout
///
/// ```json
/// {
///   "languages": ["python"],
///   "frameworks": ["flask"],
///   "excluded_frameworks": ["django"]
/// }
/// ```
///
/// Every field is required. A preference file missing one of them is
/// rejected when parsed rather than when the field is first used.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Preferences {
    /// Languages the user already knows.
    pub languages: BTreeSet<String>,

    /// Frameworks the user already knows.
    pub frameworks: BTreeSet<String>,

    /// Frameworks the user never wants to work with.
    pub excluded_frameworks: BTreeSet<String>,
}

impl FromStr for Preferences {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(data).map_err(ConfigError::Json)
    }
}

impl Display for Preferences {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            serde_json::to_string_pretty(self)
                .map_err(ConfigError::Json)?
                .as_str(),
        )
    }
}

/// Settings layout.
///
/// Optional knobs that control where projects come from and where they get
/// cloned to. Every table and field may be omitted.
///
/// ```toml
/// [feed]
/// url = "https://api.github.com/repos/KTibow/code-relay/contents/data/available_projects.json"
/// encoding = "base64"
///
/// [projects]
/// dir = "$HOME/src/code-relay"
/// ```
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Where to fetch the project feed from.
    pub feed: FeedSettings,

    /// Where to put cloned projects.
    pub projects: ProjectSettings,
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut settings: Settings = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on projects directory field.
        if let Some(dir) = settings.projects.dir.take() {
            settings.projects.dir = Some(PathBuf::from(
                shellexpand::full(dir.to_string_lossy().as_ref())
                    .map_err(ConfigError::ShellExpansion)?
                    .into_owned(),
            ));
        }

        Ok(settings)
    }
}

impl Display for Settings {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Feed settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedSettings {
    /// URL to fetch the project feed from.
    pub url: String,

    /// How the feed response body is encoded.
    pub encoding: FeedEncoding,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.into(),
            encoding: FeedEncoding::default(),
        }
    }
}

/// Encoding of the project feed response body.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedEncoding {
    /// Body is the JSON array of projects itself.
    #[default]
    Plain,

    /// Body is a JSON object whose `content` field holds the base64 encoded
    /// JSON array, as served by the GitHub contents API.
    Base64,
}

/// Project directory settings.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ProjectSettings {
    /// Directory to clone projects into.
    pub dir: Option<PathBuf>,
}

impl ProjectSettings {
    /// Projects directory, falling back to [`default_projects_dir`] if none
    /// was configured.
    ///
    /// # Errors
    ///
    /// - Return [`NoWayHome`] if no directory was configured, and the
    ///   default cannot be determined.
    pub fn resolve_dir(&self) -> std::result::Result<PathBuf, NoWayHome> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => default_projects_dir(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to (de)serialize JSON configuration.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Failed to deserialize TOML configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize TOML configuration.
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
