// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use coderelay::{
    classify::{Classifier, Severity},
    feed::{FeedClient, Project},
    launcher::{
        prepare_destination, resolve, Action, Confirmation, Git, InquireConfirmation, Launcher,
    },
    open::{open_path, Opened},
    progress::Spinner,
    store::{load_default_settings, PreferenceStore},
    Settings,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::{style, Color};
use std::{collections::BTreeSet, path::Path, process::exit};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const HELP_TEMPLATE: &str = "\
{before-help}{about-with-newline}
{usage-heading} {usage}

General:
  user-prefs     Configure what projects you want to see
  list-repos     List repos that you can help with

Project:
  start-project  Clone a project to start working on

Options:
{options}{after-help}";

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    help_template = HELP_TEMPLATE,
    override_usage = "coderelay [options] <coderelay-command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    async fn run(self) -> Result<()> {
        match self.command {
            Command::UserPrefs => run_user_prefs(),
            Command::ListRepos => run_list_repos().await,
            Command::StartProject(opts) => run_start_project(opts).await,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Configure what projects you want to see.
    #[command(override_usage = "coderelay user-prefs")]
    UserPrefs,

    /// List repos that you can help with.
    #[command(override_usage = "coderelay list-repos")]
    ListRepos,

    /// Clone a project to start working on.
    #[command(override_usage = "coderelay start-project <project_name>")]
    StartProject(StartProjectOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct StartProjectOptions {
    /// Name of project to clone, as listed by list-repos.
    #[arg(required = true, value_name = "project_name")]
    pub project_name: String,
}

#[tokio::main]
async fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run().await {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

async fn run() -> Result<()> {
    Cli::parse().run().await
}

fn run_user_prefs() -> Result<()> {
    let store = PreferenceStore::open_default()?;
    let preferences = store.load_or_create()?;

    println!("Your preferences:");
    println!(
        "{}",
        style(
            "Languages/frameworks are represented in an ID-ish format based on the full name \
             (e.g., Tailwind CSS > tailwindcss)"
        )
        .dim()
    );
    println!("Languages: {}", listing(&preferences.languages));
    println!("Frameworks: {}", listing(&preferences.frameworks));
    println!(
        "Excluded frameworks: {}",
        listing(&preferences.excluded_frameworks)
    );
    println!();

    if InquireConfirmation.confirm("Do you want to change your preferences?")? {
        open_or_explain(store.path())?;
    }

    Ok(())
}

async fn run_list_repos() -> Result<()> {
    let store = PreferenceStore::open_default()?;
    let Some(preferences) = store.load()? else {
        println!("Please run `coderelay user-prefs` to configure your preferences.");
        return Ok(());
    };

    let settings = load_default_settings()?;
    let projects = fetch_projects(&settings).await?;
    let classifier = Classifier::default();
    for project in &projects {
        let label = classifier.classify(project, &preferences);
        println!(
            "{}",
            style(format!(
                "{}, {} {}",
                project.name, project.description, label
            ))
            .fg(severity_color(label.severity()))
        );
    }

    println!("Get started on one by running `coderelay start-project <project-name>`.");

    Ok(())
}

async fn run_start_project(opts: StartProjectOptions) -> Result<()> {
    let settings = load_default_settings()?;
    let launcher = Launcher::new(settings.projects.resolve_dir()?, Git::default());
    let projects = fetch_projects(&settings).await?;

    if !launcher.git().is_available() {
        println!("Please install git first.");
        return Ok(());
    }

    let Some(project) = resolve(&opts.project_name, &projects) else {
        println!("Could not find project {}.", opts.project_name);
        return Ok(());
    };

    let destination = launcher.destination_for(&project.name)?;
    if prepare_destination(&destination, &mut InquireConfirmation)? == Action::Abort {
        println!("Aborting.");
        return Ok(());
    }

    let spinner = Spinner::start("⏳ Downloading the code...");
    let launched = launcher.launch(project).await;
    match launched {
        Ok(_) => spinner.finish("✅ Downloaded the code.").await,
        Err(_) => spinner.clear().await,
    }
    let destination = launched?;

    println!(
        "Project {} downloaded to {}.",
        project.name,
        destination.display()
    );
    if InquireConfirmation.confirm("Do you want to open the project now?")? {
        open_or_explain(&destination)?;
    }

    Ok(())
}

async fn fetch_projects(settings: &Settings) -> Result<Vec<Project>> {
    let client = FeedClient::from_settings(&settings.feed)?;
    let spinner = Spinner::start("⏳ Fetching repos...");
    let fetched = client.fetch().await;
    spinner.clear().await;

    Ok(fetched?)
}

fn open_or_explain(path: &Path) -> Result<()> {
    if open_path(path)? == Opened::Manual {
        println!("No editor found, please open {} manually.", path.display());
    }

    Ok(())
}

fn listing(items: &BTreeSet<String>) -> String {
    format!(
        "[{}]",
        items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    )
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Caution => Color::Yellow,
        Severity::Failure => Color::Red,
    }
}
