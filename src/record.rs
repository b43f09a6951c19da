// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Solution records exported from code.golf.
//!
//! The export endpoint hands back every solution a golfer ever submitted.
//! Only the handful of fields needed for mirroring are kept, everything else
//! in the payload is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Metric a solution was optimized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    /// Solution size counted in bytes.
    Bytes,

    /// Solution size counted in Unicode characters.
    Chars,
}

impl Scoring {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::Chars => "chars",
        }
    }
}

impl Display for Scoring {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for Scoring {
    type Err = UnknownScoring;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bytes" => Ok(Self::Bytes),
            "chars" => Ok(Self::Chars),
            other => Err(UnknownScoring(other.into())),
        }
    }
}

/// Scoring label is not one that code.golf uses.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown scoring category {0:?}, expected \"bytes\" or \"chars\"")]
pub struct UnknownScoring(pub String);

/// One submitted solution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    /// Hole identifier, e.g., "fizz-buzz".
    pub hole: String,

    /// Language identifier, e.g., "python".
    pub lang: String,

    /// Scoring category the solution competes in.
    pub scoring: Scoring,

    /// Time of submission.
    pub submitted: DateTime<Utc>,

    /// Source code of the solution.
    pub code: String,
}

/// Full export of a golfer's solutions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Export {
    #[serde(default)]
    pub solutions: Vec<Record>,
}

impl FromStr for Export {
    type Err = serde_json::Error;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(data)
    }
}
