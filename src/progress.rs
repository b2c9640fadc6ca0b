// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Progress display.
//!
//! Fetching the feed and cloning a project block on the network, so a
//! spinner is shown while they run. The spinner is ticked by its own task,
//! which carries no data and only watches a stop signal handed to it when it
//! is spawned. The task checks that signal every [`TICK_INTERVAL`], so it
//! exits at most one interval after being told to stop.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::debug;

/// How often the spinner advances and checks for its stop signal.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner ticked by a background task.
///
/// Dropping the spinner without calling [`Spinner::finish`] also stops the
/// background task, since the stop signal's sender goes away with it.
#[derive(Debug)]
pub struct Spinner {
    bar: ProgressBar,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Spinner {
    /// Start new spinner on standard error with given message.
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        Self::with_bar(bar, message)
    }

    /// Start spinner on existing progress bar.
    pub fn with_bar(bar: ProgressBar, message: impl Into<String>) -> Self {
        bar.set_message(message.into());
        let (stop, mut stopped) = oneshot::channel::<()>();
        let ticker = bar.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = interval.tick() => ticker.tick(),
                }
            }
            debug!("spinner task stopped");
        });

        Self { bar, stop, task }
    }

    /// Stop background task, and leave final message in place of spinner.
    pub async fn finish(self, message: impl Into<String>) {
        self.halt().await.finish_with_message(message.into());
    }

    /// Stop background task, and remove spinner from terminal.
    pub async fn clear(self) {
        self.halt().await.finish_and_clear();
    }

    async fn halt(self) -> ProgressBar {
        // INVARIANT: Task may already be gone if the runtime is shutting down.
        let _ = self.stop.send(());
        if let Err(error) = self.task.await {
            debug!("spinner task ended abnormally: {error}");
        }

        self.bar
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.yellow} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
