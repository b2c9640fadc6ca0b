// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Project match classification.
//!
//! Every project in the feed gets exactly one [`Match`] label describing how
//! well it fits the user's [`Preferences`]. Labels are decided by an ordered
//! table of rules. The first rule whose predicate holds wins, and a project
//! no rule applies to is a [`Match::Good`] match:
//!
//! 1. [`Match::NewLanguage`] if the project uses any language the user does
//!    not know. This overrides every framework based outcome.
//! 2. [`Match::ExcludedFramework`] if the project uses any framework the
//!    user excluded.
//! 3. [`Match::NewFramework`] if the project uses any framework the user
//!    does not know.
//!
//! Each rule looks at the whole of the relevant list, so the outcome does not
//! depend on the order languages or frameworks are listed in. A project that
//! lists neither is vacuously a good match.

use crate::{config::Preferences, feed::Project};

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Classification of a project against user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Match {
    /// Every language and framework is known, and none are excluded.
    Good,

    /// Some framework is unknown to the user.
    NewFramework,

    /// Some language is unknown to the user.
    NewLanguage,

    /// Some framework is excluded by the user.
    ExcludedFramework,
}

impl Match {
    /// All labels a project can be classified as.
    pub const ALL: [Match; 4] = [
        Match::Good,
        Match::NewFramework,
        Match::NewLanguage,
        Match::ExcludedFramework,
    ];

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "good match",
            Self::NewFramework => "new framework",
            Self::NewLanguage => "new language",
            Self::ExcludedFramework => "excluded framework",
        }
    }

    /// Severity tier used to present the label.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Good => Severity::Success,
            Self::NewFramework => Severity::Caution,
            Self::NewLanguage | Self::ExcludedFramework => Severity::Failure,
        }
    }
}

impl Display for Match {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.label())
    }
}

/// Presentation tier of a [`Match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Project fits the user's preferences.
    Success,

    /// Project asks the user to pick up a new framework.
    Caution,

    /// Project needs a new language, or uses an excluded framework.
    Failure,
}

/// A classification rule.
///
/// Pairs a predicate over a project and the user's preferences with the
/// label to give the project when the predicate holds.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Label assigned when predicate holds.
    pub label: Match,

    /// Predicate deciding whether rule applies.
    pub applies: fn(&Project, &Preferences) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.debug_struct("Rule").field("label", &self.label).finish()
    }
}

fn has_new_language(project: &Project, preferences: &Preferences) -> bool {
    project
        .languages
        .iter()
        .any(|language| !preferences.languages.contains(language))
}

fn has_excluded_framework(project: &Project, preferences: &Preferences) -> bool {
    project
        .frameworks
        .iter()
        .any(|framework| preferences.excluded_frameworks.contains(framework))
}

fn has_new_framework(project: &Project, preferences: &Preferences) -> bool {
    project
        .frameworks
        .iter()
        .any(|framework| !preferences.frameworks.contains(framework))
}

/// Default rule set, highest priority first.
pub static RULES: [Rule; 3] = [
    Rule {
        label: Match::NewLanguage,
        applies: has_new_language,
    },
    Rule {
        label: Match::ExcludedFramework,
        applies: has_excluded_framework,
    },
    Rule {
        label: Match::NewFramework,
        applies: has_new_framework,
    },
];

/// Ordered rule evaluator.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    rules: &'a [Rule],
    fallback: Match,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(&RULES, Match::Good)
    }
}

impl<'a> Classifier<'a> {
    /// Construct new classifier from rules ordered by priority.
    pub fn new(rules: &'a [Rule], fallback: Match) -> Self {
        Self { rules, fallback }
    }

    /// Rules in the order they are evaluated.
    pub fn rules(&self) -> &[Rule] {
        self.rules
    }

    /// Classify project against preferences.
    pub fn classify(&self, project: &Project, preferences: &Preferences) -> Match {
        self.rules
            .iter()
            .find(|rule| (rule.applies)(project, preferences))
            .map_or(self.fallback, |rule| rule.label)
    }
}

/// Classify project against preferences with the default rule set.
pub fn classify(project: &Project, preferences: &Preferences) -> Match {
    Classifier::default().classify(project, preferences)
}
