// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Open files and directories for the user.
//!
//! Prefers the platform's own file-open facility, then `xdg-open`, then
//! whatever editor `$EDITOR` names.

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, instrument};

/// Mechanism to open a path with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opener {
    /// Windows `start` through `cmd`.
    WindowsStart,

    /// macOS `open`.
    MacOpen,

    /// Desktop `xdg-open` utility.
    XdgOpen(PathBuf),

    /// User configured editor.
    Editor(OsString),
}

impl Opener {
    /// Detect best available opener for current platform and environment.
    pub fn detect() -> Option<Self> {
        if cfg!(windows) {
            return Some(Self::WindowsStart);
        }

        if cfg!(target_os = "macos") {
            return Some(Self::MacOpen);
        }

        Self::choose(
            which::which("xdg-open").ok(),
            std::env::var_os("EDITOR"),
        )
    }

    /// Choose between `xdg-open` and an editor, preferring `xdg-open`.
    pub fn choose(xdg_open: Option<PathBuf>, editor: Option<OsString>) -> Option<Self> {
        match (xdg_open, editor) {
            (Some(path), _) => Some(Self::XdgOpen(path)),
            (None, Some(editor)) if !editor.is_empty() => Some(Self::Editor(editor)),
            _ => None,
        }
    }

    /// Build command that opens `path`.
    pub fn command(&self, path: impl AsRef<Path>) -> Command {
        let path = path.as_ref();
        match self {
            Self::WindowsStart => {
                let mut cmd = Command::new("cmd");
                cmd.args([OsStr::new("/C"), OsStr::new("start"), OsStr::new("")])
                    .arg(path);
                cmd
            }
            Self::MacOpen => {
                let mut cmd = Command::new("open");
                cmd.arg(path);
                cmd
            }
            Self::XdgOpen(program) => {
                let mut cmd = Command::new(program);
                cmd.arg(path);
                cmd
            }
            Self::Editor(editor) => {
                let mut cmd = Command::new(editor);
                cmd.arg(path);
                cmd
            }
        }
    }
}

/// Outcome of trying to open a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    /// Path was handed to an opener.
    With(Opener),

    /// No opener is available, so the user must open the path manually.
    Manual,
}

/// Open `path` with best available opener.
///
/// Blocks until the opener exits, which matters for terminal editors.
///
/// # Errors
///
/// - Return [`OpenError`] if the opener cannot be run, or exits with a
///   failure.
#[instrument(skip(path), fields(path = %path.as_ref().display()), level = "debug")]
pub fn open_path(path: impl AsRef<Path>) -> Result<Opened> {
    let Some(opener) = Opener::detect() else {
        debug!("no opener available");
        return Ok(Opened::Manual);
    };

    debug!("open with {opener:?}");
    let status = opener.command(path.as_ref()).status()?;
    if !status.success() {
        return Err(OpenError::Failed { opener, status });
    }

    Ok(Opened::With(opener))
}

/// File opening error types.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// Opener cannot be spawned.
    #[error("cannot run opener")]
    Spawn(#[from] std::io::Error),

    /// Opener ran but failed.
    #[error("opener {opener:?} failed with {status}")]
    Failed {
        opener: Opener,
        status: std::process::ExitStatus,
    },
}

/// Friendly result alias :3
pub type Result<T, E = OpenError> = std::result::Result<T, E>;
