// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Project launching.
//!
//! Starting on a project means cloning it into the projects directory, by
//! default `<documents>/code-relay/<project-name>`, and leaving a note behind
//! about where it came from.
//!
//! # Metadata Stamp
//!
//! Every cloned project receives a `coderelay.json` file at its top-level
//! holding the full project record from the feed. The stamp is local to the
//! user, so it is added to the project's `.gitignore` to keep it out of
//! commits. The ignore entry is only ever appended once.
//!
//! # Existing Destinations
//!
//! A destination that already exists is only removed after the caller
//! confirms it through a [`Confirmation`]. Declining leaves the destination
//! untouched.

use crate::{feed::Project, path::PREFERENCES_FILE};

use serde::Serialize;
use std::{
    ffi::OsString,
    fs::{create_dir_all, read_to_string, remove_dir_all, remove_file, write, OpenOptions},
    io::{ErrorKind, Write as _},
    path::{Component, Path, PathBuf},
    process::{ExitStatus, Stdio},
};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// File name of metadata stamp written into cloned projects.
pub const STAMP_FILE: &str = PREFERENCES_FILE;

/// File name of git's ignore file.
pub const IGNORE_FILE: &str = ".gitignore";

const IGNORE_BLOCK: &str = "\n# Code Relay\ncoderelay.json\n";

/// Find project by exact name in feed.
///
/// Returns first project with matching name, or `None` if the feed does not
/// list it.
pub fn resolve<'a>(name: &str, feed: &'a [Project]) -> Option<&'a Project> {
    feed.iter().find(|project| project.name == name)
}

/// What was done to prepare a destination for cloning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Destination did not exist, and will be created by the clone.
    Create,

    /// Destination existed, and was deleted after confirmation.
    Recreate,

    /// Destination existed, and user declined to delete it.
    Abort,
}

/// Ask the user to confirm a destructive action.
pub trait Confirmation {
    /// Ask yes or no question.
    ///
    /// # Errors
    ///
    /// - Return [`LaunchError::Prompt`] if the answer cannot be obtained.
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Confirmation through an interactive terminal prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquireConfirmation;

impl Confirmation for InquireConfirmation {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        inquire::Confirm::new(message)
            .with_default(false)
            .prompt()
            .map_err(LaunchError::Prompt)
    }
}

/// Prepare destination path for cloning.
///
/// Existing destinations are only deleted if `confirmation` answers yes.
///
/// # Errors
///
/// - Return [`LaunchError::Prompt`] if confirmation cannot be obtained.
/// - Return [`LaunchError::Io`] if existing destination cannot be deleted.
#[instrument(skip(path, confirmation), fields(path = %path.as_ref().display()), level = "debug")]
pub fn prepare_destination(
    path: impl AsRef<Path>,
    confirmation: &mut impl Confirmation,
) -> Result<Action> {
    let path = path.as_ref();
    if path.symlink_metadata().is_err() {
        return Ok(Action::Create);
    }

    let message = format!("Project at {} already exists. Delete it?", path.display());
    if !confirmation.confirm(&message)? {
        warn!("leave {:?} untouched", path.display());
        return Ok(Action::Abort);
    }

    info!("delete {:?}", path.display());
    let removed = if path.is_dir() {
        remove_dir_all(path)
    } else {
        remove_file(path)
    };
    removed.map_err(|err| LaunchError::Io {
        source: err,
        path: path.to_path_buf(),
    })?;

    Ok(Action::Recreate)
}

/// Write metadata stamp of project into its destination, and make sure git
/// ignores it.
///
/// # Errors
///
/// - Return [`LaunchError::Io`] if stamp or ignore file cannot be written.
/// - Return [`LaunchError::Json`] if project cannot be serialized.
#[instrument(skip(path, project), fields(project = %project.name), level = "debug")]
pub fn stamp_metadata(path: impl AsRef<Path>, project: &Project) -> Result<()> {
    let path = path.as_ref();
    ensure_ignored(path.join(IGNORE_FILE))?;

    let stamp_path = path.join(STAMP_FILE);
    let mut stamp = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut stamp, formatter);
    project.serialize(&mut serializer)?;
    stamp.push(b'\n');

    debug!("write metadata stamp to {:?}", stamp_path.display());
    write(&stamp_path, stamp).map_err(|err| LaunchError::Io {
        source: err,
        path: stamp_path,
    })
}

fn ensure_ignored(ignore_path: PathBuf) -> Result<()> {
    let content = match read_to_string(&ignore_path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
        Err(err) => {
            return Err(LaunchError::Io {
                source: err,
                path: ignore_path,
            })
        }
    };

    // INVARIANT: Never duplicate the ignore entry.
    if content.contains(STAMP_FILE) {
        debug!("{:?} already ignores stamp", ignore_path.display());
        return Ok(());
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&ignore_path)
        .and_then(|mut file| file.write_all(IGNORE_BLOCK.as_bytes()))
        .map_err(|err| LaunchError::Io {
            source: err,
            path: ignore_path,
        })
}

/// Git client invoked as an external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Git {
    program: OsString,
}

impl Default for Git {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Git {
    /// Construct git client that runs `program`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate git binary.
    ///
    /// # Errors
    ///
    /// - Return [`LaunchError::VcsMissing`] if git cannot be found.
    pub fn locate(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|_| LaunchError::VcsMissing {
            program: self.program.clone(),
        })
    }

    /// Check if git is installed.
    pub fn is_available(&self) -> bool {
        self.locate().is_ok()
    }

    /// Clone repository at `url` into `path`.
    ///
    /// Output of git is discarded.
    ///
    /// # Errors
    ///
    /// - Return [`LaunchError::VcsMissing`] if git cannot be found.
    /// - Return [`LaunchError::Io`] if parent of `path` cannot be created.
    /// - Return [`LaunchError::Spawn`] if git cannot be started.
    /// - Return [`LaunchError::CloneFailed`] if git exits with failure.
    #[instrument(skip(self, url, path), fields(url = %url.as_ref()), level = "debug")]
    pub async fn clone_repository(
        &self,
        url: impl AsRef<str>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let program = self.locate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            create_dir_all(parent).map_err(|err| LaunchError::Io {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        debug!("clone {} into {:?}", url.as_ref(), path.display());
        let status = Command::new(program)
            .arg("clone")
            .arg("--")
            .arg(url.as_ref())
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(LaunchError::Spawn)?;

        if !status.success() {
            return Err(LaunchError::CloneFailed {
                url: url.as_ref().to_string(),
                status,
            });
        }

        Ok(())
    }
}

/// Clones projects into the projects directory.
#[derive(Debug, Clone)]
pub struct Launcher {
    projects_dir: PathBuf,
    git: Git,
}

impl Launcher {
    /// Construct new launcher cloning into `projects_dir`.
    pub fn new(projects_dir: impl Into<PathBuf>, git: Git) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            git,
        }
    }

    /// Directory projects are cloned into.
    pub fn projects_dir(&self) -> &Path {
        self.projects_dir.as_path()
    }

    /// Git client used for cloning.
    pub fn git(&self) -> &Git {
        &self.git
    }

    /// Destination path of project.
    ///
    /// # Errors
    ///
    /// - Return [`LaunchError::InvalidName`] if name is not a plain
    ///   directory name, e.g., contains path separators or is "..".
    pub fn destination_for(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.projects_dir.join(name)),
            _ => Err(LaunchError::InvalidName(name.to_string())),
        }
    }

    /// Clone project into its destination, and stamp it with its metadata.
    ///
    /// Destination must already be prepared through [`prepare_destination`].
    ///
    /// # Errors
    ///
    /// - Return [`LaunchError`] if cloning or stamping fails.
    pub async fn launch(&self, project: &Project) -> Result<PathBuf> {
        let destination = self.destination_for(&project.name)?;
        self.git.clone_repository(&project.repository_url, &destination).await?;
        stamp_metadata(&destination, project)?;

        Ok(destination)
    }
}

/// Project launching error types.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Git is not installed.
    #[error("cannot find {program:?}, please install git first")]
    VcsMissing { program: OsString },

    /// Git cannot be started.
    #[error("cannot start git")]
    Spawn(#[source] std::io::Error),

    /// Git clone exits with failure.
    #[error("failed to clone {url:?} ({status})")]
    CloneFailed { url: String, status: ExitStatus },

    /// Project name cannot be used as directory name.
    #[error("project name {0:?} is not a valid directory name")]
    InvalidName(String),

    /// File system operation fails.
    #[error("cannot access {:?}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Project record cannot be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Confirmation prompt fails.
    #[error(transparent)]
    Prompt(#[from] inquire::InquireError),
}

/// Friendly result alias :3
pub type Result<T, E = LaunchError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::FeedEncoding, feed::parse_feed};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    struct Answer {
        yes: bool,
        asked: Vec<String>,
    }

    impl Answer {
        fn new(yes: bool) -> Self {
            Self {
                yes,
                asked: Vec::new(),
            }
        }
    }

    impl Confirmation for Answer {
        fn confirm(&mut self, message: &str) -> Result<bool> {
            self.asked.push(message.to_string());
            Ok(self.yes)
        }
    }

    fn feed() -> Vec<Project> {
        ["alpha", "beta", "gamma", "delta", "epsilon"]
            .iter()
            .map(|name| Project {
                name: name.to_string(),
                repository_url: format!("https://example.org/{name}.git"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn resolve_finds_exact_name() {
        let feed = feed();
        let result = resolve("gamma", &feed).map(|project| project.repository_url.as_str());
        assert_eq!(result, Some("https://example.org/gamma.git"));
    }

    #[test]
    fn resolve_missing_name_is_none() {
        let feed = feed();
        assert_eq!(resolve("zeta", &feed), None);
        assert_eq!(resolve("Gamma", &feed), None);
    }

    #[test]
    fn resolve_returns_first_duplicate() {
        let mut feed = feed();
        feed.push(Project {
            name: "alpha".into(),
            repository_url: "https://example.org/other.git".into(),
            ..Default::default()
        });
        assert_eq!(
            resolve("alpha", &feed).map(|project| project.repository_url.as_str()),
            Some("https://example.org/alpha.git")
        );
    }

    #[test]
    fn vacant_destination_is_created_without_asking() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        let mut answer = Answer::new(true);

        let result = prepare_destination(root.path().join("alpha"), &mut answer)?;
        assert_eq!(result, Action::Create);
        assert!(answer.asked.is_empty());

        Ok(())
    }

    #[test]
    fn declined_destination_is_left_untouched() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        let destination = root.path().join("alpha");
        create_dir_all(destination.join("src"))?;
        write(destination.join("src").join("main.py"), "print('hi')\n")?;
        let mut answer = Answer::new(false);

        let result = prepare_destination(&destination, &mut answer)?;
        assert_eq!(result, Action::Abort);
        assert_eq!(answer.asked.len(), 1);
        assert_eq!(
            read_to_string(destination.join("src").join("main.py"))?,
            "print('hi')\n"
        );

        Ok(())
    }

    #[test]
    fn confirmed_destination_is_deleted() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        let destination = root.path().join("alpha");
        create_dir_all(destination.join("src"))?;
        write(destination.join("README.md"), "# alpha\n")?;
        let mut answer = Answer::new(true);

        let result = prepare_destination(&destination, &mut answer)?;
        assert_eq!(result, Action::Recreate);
        assert!(!destination.exists());

        Ok(())
    }

    #[test]
    fn stamp_appends_ignore_entry_once() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        write(root.path().join(IGNORE_FILE), "target/\n")?;
        let project = feed().remove(0);

        stamp_metadata(root.path(), &project)?;
        stamp_metadata(root.path(), &project)?;

        let result = read_to_string(root.path().join(IGNORE_FILE))?;
        let expect = indoc! {"
            target/

            # Code Relay
            coderelay.json
        "};
        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn stamp_respects_existing_ignore_entry() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        write(root.path().join(IGNORE_FILE), "*.log\ncoderelay.json\n")?;

        stamp_metadata(root.path(), &feed().remove(0))?;

        assert_eq!(
            read_to_string(root.path().join(IGNORE_FILE))?,
            "*.log\ncoderelay.json\n"
        );

        Ok(())
    }

    #[test]
    fn stamp_creates_missing_ignore_file() -> anyhow::Result<()> {
        let root = TempDir::new()?;

        stamp_metadata(root.path(), &feed().remove(0))?;

        assert_eq!(
            read_to_string(root.path().join(IGNORE_FILE))?,
            IGNORE_BLOCK
        );

        Ok(())
    }

    #[test]
    fn stamp_holds_project_record_as_fetched() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        let body = r#"[{
            "name": "beta",
            "desc": "second project",
            "languages": ["rust"],
            "frameworks": [],
            "git": "https://example.org/beta.git",
            "url": "https://beta.example.org",
            "issues": 12
        }]"#;
        let project = parse_feed(body, FeedEncoding::Plain)?.remove(0);

        stamp_metadata(root.path(), &project)?;

        let content = read_to_string(root.path().join(STAMP_FILE))?;
        assert!(content.starts_with("{\n    \"name\": \"beta\""));
        let result: Value = serde_json::from_str(&content)?;
        assert_eq!(
            result,
            json!({
                "name": "beta",
                "desc": "second project",
                "languages": ["rust"],
                "frameworks": [],
                "git": "https://example.org/beta.git",
                "url": "https://beta.example.org",
                "issues": 12
            })
        );

        Ok(())
    }

    #[test]
    fn destination_rejects_path_like_names() {
        let launcher = Launcher::new("/projects", Git::default());
        assert_eq!(
            launcher.destination_for("alpha").ok(),
            Some(PathBuf::from("/projects/alpha"))
        );
        for name in ["", "..", "../escape", "a/b", "/etc", "."] {
            assert!(
                matches!(launcher.destination_for(name), Err(LaunchError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn missing_git_is_reported() -> anyhow::Result<()> {
        let root = TempDir::new()?;
        let git = Git::new("definitely-not-a-real-vcs-binary");
        assert!(!git.is_available());

        let result = git
            .clone_repository("https://example.org/alpha.git", root.path().join("alpha"))
            .await;
        assert!(matches!(result, Err(LaunchError::VcsMissing { .. })));
        assert!(!root.path().join("alpha").exists());

        Ok(())
    }
}
