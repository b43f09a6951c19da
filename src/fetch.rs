// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Export retrieval.
//!
//! code.golf exposes every solution of the logged-in golfer through a single
//! export endpoint. Authentication happens through the session cookie of a
//! browser login, which is a plain UUID.
//!
//! Fetching is a single request. There is no retry or timeout policy, so
//! callers that need resilience must wrap it themselves.

use crate::record::Export;

use reqwest::{header::COOKIE, Client};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Export endpoint of code.golf.
pub const EXPORT_URL: &str = "https://code.golf/golfer/export";

/// Name of session cookie.
pub const SESSION_COOKIE: &str = "__Host-session";

/// Session cookie value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session(Uuid);

impl Display for Session {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{}", self.0)
    }
}

impl FromStr for Session {
    type Err = FetchError;

    fn from_str(value: &str) -> Result<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| FetchError::InvalidSession)
    }
}

/// Fetch solution export of golfer owning session.
///
/// # Errors
///
/// - Return [`FetchError::Request`] if request fails, or the response body
///   is not a valid export.
/// - Return [`FetchError::Status`] if code.golf rejects the request.
#[instrument(skip(session), level = "debug")]
pub async fn fetch_export(session: &Session) -> Result<Export> {
    info!("export solutions from {EXPORT_URL}");
    let response = Client::new()
        .get(EXPORT_URL)
        .header(COOKIE, format!("{SESSION_COOKIE}={session}"))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let export: Export = response.json().await?;
    debug!("received {} solutions", export.solutions.len());

    Ok(export)
}

/// Load previously saved export from disk.
///
/// # Errors
///
/// - Return [`FetchError::ReadExport`] if the file cannot be read.
/// - Return [`FetchError::ParseExport`] if the file is not a valid export.
pub fn load_export(path: impl AsRef<Path>) -> Result<Export> {
    let path = path.as_ref();
    info!("load solutions from {}", path.display());
    read_to_string(path)
        .map_err(|err| FetchError::ReadExport {
            source: err,
            path: path.to_path_buf(),
        })?
        .parse()
        .map_err(|err| FetchError::ParseExport {
            source: err,
            path: path.to_path_buf(),
        })
}

/// Export retrieval error types.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Session value is not a UUID.
    #[error("session is not a valid UUID, use the value of the {SESSION_COOKIE:?} cookie")]
    InvalidSession,

    /// Request could not be completed.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// code.golf answered with something other than success.
    #[error("export request failed with status {0}")]
    Status(reqwest::StatusCode),

    /// Saved export cannot be read.
    #[error("failed to read export at {:?}", path.display())]
    ReadExport {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Saved export is malformed.
    #[error("failed to parse export at {:?}", path.display())]
    ParseExport {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = FetchError> = std::result::Result<T, E>;
