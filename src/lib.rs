// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Find open-source projects that want help, and start working on one.
//!
//! # Code Relay
//!
//! Maintainers ask for help on a project, and contributors help with it a
//! couple lines of code at a time. coderelay fetches the list of projects
//! asking for help, tells the user how well each one fits the languages and
//! frameworks they know, and clones the one they pick.
//!
//! # Layout
//!
//! - [`store`] keeps the user's [`Preferences`] on disk.
//! - [`feed`] fetches the [`Project`] listing.
//! - [`classify`] labels each project with a [`Match`].
//! - [`launcher`] clones a project and stamps it with its metadata.

pub mod classify;
pub mod config;
pub mod feed;
pub mod launcher;
pub mod open;
pub mod path;
pub mod progress;
pub mod store;

pub use classify::{classify, Classifier, Match, Severity};
pub use config::{FeedEncoding, Preferences, Settings};
pub use feed::{FeedClient, Project};
pub use launcher::{Action, Git, Launcher};
pub use store::PreferenceStore;
