// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{git_installed, RepoFixture};

use anyhow::Result;
use coderelay::{
    classify,
    launcher::{prepare_destination, resolve, Confirmation, LaunchError, Result as LaunchResult},
    Action, FeedClient, FeedEncoding, Git, Launcher, Match, PreferenceStore, Project,
};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs::{read_to_string, write};
use tempfile::TempDir;

struct Answer(bool);

impl Confirmation for Answer {
    fn confirm(&mut self, _message: &str) -> LaunchResult<bool> {
        Ok(self.0)
    }
}

fn upstream(root: &TempDir) -> Result<RepoFixture> {
    let fixture = RepoFixture::new(root.path().join("upstream"))?;
    fixture.stage_and_commit("README.md", "# relay\n")?;
    fixture.stage_and_commit(".gitignore", "target/\n")?;

    Ok(fixture)
}

#[tokio::test]
async fn launch_clones_and_stamps_project() -> Result<()> {
    if !git_installed() {
        return Ok(());
    }

    let root = TempDir::new()?;
    let fixture = upstream(&root)?;
    let project = fixture.project("relay");
    let launcher = Launcher::new(root.path().join("projects"), Git::default());

    let destination = launcher.destination_for(&project.name)?;
    assert_eq!(
        prepare_destination(&destination, &mut Answer(false))?,
        Action::Create
    );
    let result = launcher.launch(&project).await?;

    assert_eq!(result, destination);
    assert_eq!(read_to_string(result.join("README.md"))?, "# relay\n");
    assert_eq!(
        read_to_string(result.join(".gitignore"))?,
        "target/\n\n# Code Relay\ncoderelay.json\n"
    );
    let stamp: Value = serde_json::from_str(&read_to_string(result.join("coderelay.json"))?)?;
    assert_eq!(stamp["name"], json!("relay"));
    assert_eq!(stamp["git"], json!(fixture.url()));

    Ok(())
}

#[tokio::test]
async fn confirmed_relaunch_replaces_existing_clone() -> Result<()> {
    if !git_installed() {
        return Ok(());
    }

    let root = TempDir::new()?;
    let fixture = upstream(&root)?;
    let project = fixture.project("relay");
    let launcher = Launcher::new(root.path().join("projects"), Git::default());
    let destination = launcher.launch(&project).await?;
    write(destination.join("scratch.txt"), "local work\n")?;

    assert_eq!(
        prepare_destination(&destination, &mut Answer(true))?,
        Action::Recreate
    );
    launcher.launch(&project).await?;

    assert!(!destination.join("scratch.txt").exists());
    assert!(destination.join("coderelay.json").exists());

    Ok(())
}

#[tokio::test]
async fn declined_relaunch_leaves_clone_untouched() -> Result<()> {
    if !git_installed() {
        return Ok(());
    }

    let root = TempDir::new()?;
    let fixture = upstream(&root)?;
    let project = fixture.project("relay");
    let launcher = Launcher::new(root.path().join("projects"), Git::default());
    let destination = launcher.launch(&project).await?;
    write(destination.join("scratch.txt"), "local work\n")?;

    assert_eq!(
        prepare_destination(&destination, &mut Answer(false))?,
        Action::Abort
    );

    assert_eq!(
        read_to_string(destination.join("scratch.txt"))?,
        "local work\n"
    );

    Ok(())
}

#[tokio::test]
async fn unreachable_repository_fails_clone() -> Result<()> {
    if !git_installed() {
        return Ok(());
    }

    let root = TempDir::new()?;
    let project = Project {
        name: "ghost".into(),
        repository_url: root.path().join("nowhere").to_string_lossy().into_owned(),
        ..Default::default()
    };
    let launcher = Launcher::new(root.path().join("projects"), Git::default());

    let result = launcher.launch(&project).await;
    assert!(matches!(result, Err(LaunchError::CloneFailed { .. })));

    Ok(())
}

#[tokio::test]
async fn feed_projects_are_classified_against_stored_preferences() -> Result<()> {
    let root = TempDir::new()?;
    let store = PreferenceStore::new(root.path().join("coderelay").join("coderelay.json"));
    let mut preferences = store.load_or_create()?;
    preferences.languages.insert("python".into());
    preferences.frameworks.insert("flask".into());
    preferences.excluded_frameworks.insert("django".into());
    store.save(&preferences)?;

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/available_projects.json");
            then.status(200).json_body(json!([
                { "name": "a", "desc": "flask app", "languages": ["python"], "frameworks": ["flask"], "git": "https://example.org/a.git" },
                { "name": "b", "desc": "fastapi app", "languages": ["python"], "frameworks": ["fastapi"], "git": "https://example.org/b.git" },
                { "name": "c", "desc": "django app", "languages": ["python"], "frameworks": ["django"], "git": "https://example.org/c.git" },
                { "name": "d", "desc": "rust tool", "languages": ["rust"], "frameworks": ["django"], "git": "https://example.org/d.git" },
                { "name": "e", "desc": "docs", "languages": [], "frameworks": [], "git": "https://example.org/e.git" }
            ]));
        })
        .await;

    let client = FeedClient::new(server.url("/available_projects.json"), FeedEncoding::Plain)?;
    let projects = client.fetch().await?;
    let preferences = store.load()?.unwrap_or_default();

    let result = projects
        .iter()
        .map(|project| (project.name.as_str(), classify(project, &preferences)))
        .collect::<Vec<_>>();
    assert_eq!(
        result,
        vec![
            ("a", Match::Good),
            ("b", Match::NewFramework),
            ("c", Match::ExcludedFramework),
            ("d", Match::NewLanguage),
            ("e", Match::Good),
        ]
    );
    assert_eq!(resolve("f", &projects), None);
    assert_eq!(
        resolve("c", &projects).map(|project| project.repository_url.as_str()),
        Some("https://example.org/c.git")
    );

    Ok(())
}
