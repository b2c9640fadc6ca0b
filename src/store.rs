// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Preference and settings storage.
//!
//! The user's preferences live in a single JSON file, by default at
//! `$XDG_CONFIG_HOME/coderelay/coderelay.json`. The file is created with
//! empty preferences the first time the user asks to view them, and is only
//! ever changed afterwards by the user through their editor.
//!
//! Invocations are short-lived and single-user, so no locking is performed.

use crate::{
    config::{ConfigError, Preferences, Settings},
    path::{default_preferences_path, default_settings_path, NoWayHome},
};

use std::{
    fs::{create_dir_all, read_to_string, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Preference file manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Construct new preference store backed by file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Construct preference store at the default per-user location.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::NoWayHome`] if configuration directory cannot
    ///   be determined.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_preferences_path()?))
    }

    /// Path to backing preference file.
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Load preferences, creating an empty preference file first if needed.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Io`] if the file or its parent directories
    ///   cannot be created or read.
    /// - Return [`StoreError::Format`] if the file is not a valid preference
    ///   document.
    #[instrument(skip(self), fields(path = %self.path.display()), level = "debug")]
    pub fn load_or_create(&self) -> Result<Preferences> {
        if !self.path.exists() {
            info!("create preference file at {:?}", self.path.display());
            self.save(&Preferences::default())?;
        }

        self.read()
    }

    /// Load preferences without creating anything.
    ///
    /// Returns `None` if the preference file does not exist yet.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Io`] if the file cannot be read.
    /// - Return [`StoreError::Format`] if the file is not a valid preference
    ///   document.
    pub fn load(&self) -> Result<Option<Preferences>> {
        match self.read() {
            Ok(preferences) => Ok(Some(preferences)),
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!("no preference file at {:?}", self.path.display());
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Write preferences to the preference file, creating parent directories
    /// as needed.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Io`] if the file or its parent directories
    ///   cannot be written.
    pub fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            create_dir_all(parent).map_err(|err| StoreError::Io {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        write(&self.path, preferences.to_string()).map_err(|err| StoreError::Io {
            source: err,
            path: self.path.clone(),
        })
    }

    fn read(&self) -> Result<Preferences> {
        let content = read_to_string(&self.path).map_err(|err| StoreError::Io {
            source: err,
            path: self.path.clone(),
        })?;

        content.parse().map_err(|err| StoreError::Format {
            source: err,
            path: self.path.clone(),
        })
    }
}

/// Load settings from file at `path`.
///
/// A missing settings file is not an error; default settings are used.
///
/// # Errors
///
/// - Return [`StoreError::Io`] if the file exists but cannot be read.
/// - Return [`StoreError::Format`] if the file is not valid settings.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no settings file at {:?}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(err) => {
            return Err(StoreError::Io {
                source: err,
                path: path.to_path_buf(),
            })
        }
    };

    content.parse().map_err(|err| StoreError::Format {
        source: err,
        path: path.to_path_buf(),
    })
}

/// Load settings from the default per-user location.
///
/// # Errors
///
/// - Return [`StoreError::NoWayHome`] if configuration directory cannot be
///   determined.
/// - See [`load_settings`].
pub fn load_default_settings() -> Result<Settings> {
    load_settings(default_settings_path()?)
}

/// Preference storage error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Configuration file cannot be created, read, or written.
    #[error("cannot access configuration file at {:?}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Configuration file content is malformed.
    #[error("malformed configuration file at {:?}", path.display())]
    Format {
        #[source]
        source: ConfigError,
        path: PathBuf,
    },

    /// Configuration directory cannot be determined.
    #[error(transparent)]
    NoWayHome(#[from] NoWayHome),
}

/// Friendly result alias :3
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
