// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Project feed.
//!
//! Maintainers that want help list their projects in a static JSON document.
//! Each entry names the project, describes it, lists the languages and
//! frameworks it uses, and gives the URL to clone it from:
//!
//! ```json
//! [
//!   {
//!     "name": "code-relay",
//!     "desc": "Find projects that want help.",
//!     "languages": ["python"],
//!     "frameworks": ["click"],
//!     "git": "https://github.com/KTibow/code-relay.git"
//!   }
//! ]
//! ```
//!
//! The feed is fetched once per invocation with a single unauthenticated GET.
//! Nothing is cached between invocations.
//!
//! # Legacy Encoding
//!
//! Older releases read the feed through the GitHub contents API, which wraps
//! the document in an object whose `content` field holds it base64 encoded.
//! That variant is still understood when selected through
//! [`FeedEncoding::Base64`].

use crate::config::{FeedEncoding, FeedSettings};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{de, de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Keys a project description is read from, in order of preference.
const DESCRIPTION_KEYS: [&str; 2] = ["desc", "description"];

/// Keys a project clone URL is read from, in order of preference.
const REPOSITORY_KEYS: [&str; 3] = ["git", "repository_url", "url"];

/// Candidate project from the feed.
///
/// The typed fields are read out of the entry the feed listed, which is kept
/// whole in `record`. Serializing a project writes that record back out
/// unchanged, only filling in typed fields the record has no key for.
#[derive(Default, Debug, PartialEq, Clone, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Project {
    /// Unique name of project within feed.
    pub name: String,

    /// Brief description of project.
    pub description: String,

    /// Languages used by project.
    pub languages: Vec<String>,

    /// Frameworks used by project.
    pub frameworks: Vec<String>,

    /// URL to clone project from.
    pub repository_url: String,

    /// Entry as fetched from the feed.
    pub record: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Project {
    type Error = serde_json::Error;

    fn try_from(record: Map<String, Value>) -> Result<Self, Self::Error> {
        // INVARIANT: Fallback keys are only consulted when earlier keys are absent.
        let name = lookup(&record, &["name"])?.ok_or_else(|| missing("name"))?;
        let repository_url = lookup(&record, &REPOSITORY_KEYS)?.ok_or_else(|| missing("git"))?;

        Ok(Self {
            name,
            description: lookup(&record, &DESCRIPTION_KEYS)?.unwrap_or_default(),
            languages: lookup(&record, &["languages"])?.unwrap_or_default(),
            frameworks: lookup(&record, &["frameworks"])?.unwrap_or_default(),
            repository_url,
            record,
        })
    }
}

impl From<Project> for Map<String, Value> {
    fn from(project: Project) -> Self {
        let mut record = project.record;
        let typed = [
            (&["name"][..], Value::from(project.name)),
            (&DESCRIPTION_KEYS[..], Value::from(project.description)),
            (&["languages"][..], Value::from(project.languages)),
            (&["frameworks"][..], Value::from(project.frameworks)),
            (&REPOSITORY_KEYS[..], Value::from(project.repository_url)),
        ];
        for (keys, value) in typed {
            if !keys.iter().any(|key| record.contains_key(*key)) {
                record.insert(keys[0].to_string(), value);
            }
        }

        record
    }
}

fn lookup<T: DeserializeOwned>(
    record: &Map<String, Value>,
    keys: &[&str],
) -> Result<Option<T>, serde_json::Error> {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|value| !value.is_null()))
        .map(|value| T::deserialize(value))
        .transpose()
}

fn missing(field: &'static str) -> serde_json::Error {
    de::Error::missing_field(field)
}

/// Client for the project feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    url: String,
    encoding: FeedEncoding,
}

impl FeedClient {
    /// Construct new feed client.
    ///
    /// # Errors
    ///
    /// - Return [`FeedError::Client`] if HTTP client cannot be built.
    pub fn new(url: impl Into<String>, encoding: FeedEncoding) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("coderelay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FeedError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
            encoding,
        })
    }

    /// Construct new feed client from feed settings.
    ///
    /// # Errors
    ///
    /// - Return [`FeedError::Client`] if HTTP client cannot be built.
    pub fn from_settings(settings: &FeedSettings) -> Result<Self> {
        Self::new(settings.url.clone(), settings.encoding)
    }

    /// URL the feed is fetched from.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Fetch all available projects.
    ///
    /// # Errors
    ///
    /// - Return [`FeedError::Request`] if the request cannot be made, or the
    ///   server answers with an error status.
    /// - Return [`FeedError::Json`] or [`FeedError::Base64`] if the response
    ///   body cannot be decoded into a project listing.
    #[instrument(skip(self), fields(url = %self.url), level = "debug")]
    pub async fn fetch(&self) -> Result<Vec<Project>> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(FeedError::Request)?
            .text()
            .await
            .map_err(FeedError::Request)?;
        debug!("received {} bytes", body.len());

        let projects = parse_feed(&body, self.encoding)?;
        debug!("fetched {} projects", projects.len());

        Ok(projects)
    }
}

/// Legacy feed envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    content: String,
}

/// Decode feed response body into project listing.
///
/// # Errors
///
/// - Return [`FeedError::Json`] if body, or the document it wraps, is not a
///   valid project listing.
/// - Return [`FeedError::Base64`] if wrapped document is not valid base64.
/// - Return [`FeedError::Utf8`] if wrapped document is not valid UTF-8.
pub fn parse_feed(body: &str, encoding: FeedEncoding) -> Result<Vec<Project>> {
    match encoding {
        FeedEncoding::Plain => Ok(serde_json::from_str(body)?),
        FeedEncoding::Base64 => {
            let envelope: Envelope = serde_json::from_str(body)?;

            // INVARIANT: GitHub breaks encoded content into lines.
            let packed = envelope
                .content
                .chars()
                .filter(|ch| !ch.is_ascii_whitespace())
                .collect::<String>();
            let document = String::from_utf8(STANDARD.decode(packed)?)?;

            Ok(serde_json::from_str(&document)?)
        }
    }
}

/// Project feed error types.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP client cannot be constructed.
    #[error("cannot construct HTTP client")]
    Client(#[source] reqwest::Error),

    /// Feed cannot be fetched.
    #[error("project feed unavailable")]
    Request(#[source] reqwest::Error),

    /// Feed is not a valid project listing.
    #[error("project feed is not a valid project listing")]
    Json(#[from] serde_json::Error),

    /// Legacy feed content is not valid base64.
    #[error("project feed content is not valid base64")]
    Base64(#[from] base64::DecodeError),

    /// Legacy feed content is not valid UTF-8.
    #[error("project feed content is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Friendly result alias :3
pub type Result<T, E = FeedError> = std::result::Result<T, E>;
