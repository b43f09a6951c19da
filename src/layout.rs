// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Solution file layouts.
//!
//! A __layout__ decides where a solution lives inside the mirror. Each
//! layout derives a forward-slash separated relative path from the hole,
//! the language, and optionally the scoring category of a solution:
//!
//! | Code  | Example                          |
//! |-------|----------------------------------|
//! | `lhe` | `javascript/fizz-buzz-chars.js`  |
//! | `hle` | `fizz-buzz/javascript-chars.js`  |
//! | `hse` | `fizz-buzz/solution-chars.js`    |
//! | `he`  | `fizz-buzz-chars.js`             |
//!
//! Leaving the scoring category out drops the `-<scoring>` suffix entirely.

use crate::{language::Language, record::Scoring};

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// File layout of the mirror.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Layout {
    /// `<lang>/<hole>[-<scoring>].<ext>`
    #[default]
    #[serde(rename = "lhe")]
    LanguageHoleExtension,

    /// `<hole>/<lang>[-<scoring>].<ext>`
    #[serde(rename = "hle")]
    HoleLanguageExtension,

    /// `<hole>/solution[-<scoring>].<ext>`
    #[serde(rename = "hse")]
    HoleSolutionExtension,

    /// `<hole>[-<scoring>].<ext>`
    #[serde(rename = "he")]
    HoleExtension,
}

impl Layout {
    /// Short code of layout.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LanguageHoleExtension => "lhe",
            Self::HoleLanguageExtension => "hle",
            Self::HoleSolutionExtension => "hse",
            Self::HoleExtension => "he",
        }
    }

    /// Resolve relative path of a solution.
    ///
    /// # Errors
    ///
    /// - Return [`LayoutError::UnknownLanguage`] if `lang` is not a known
    ///   language identifier.
    pub fn resolve(&self, hole: &str, lang: &str, scoring: Option<Scoring>) -> Result<String> {
        let language =
            Language::lookup(lang).ok_or_else(|| LayoutError::UnknownLanguage(lang.into()))?;
        let extension = language.extension;
        let suffix = scoring
            .map(|scoring| format!("-{scoring}"))
            .unwrap_or_default();

        Ok(match self {
            Self::LanguageHoleExtension => format!("{lang}/{hole}{suffix}.{extension}"),
            Self::HoleLanguageExtension => format!("{hole}/{lang}{suffix}.{extension}"),
            Self::HoleSolutionExtension => format!("{hole}/solution{suffix}.{extension}"),
            Self::HoleExtension => format!("{hole}{suffix}.{extension}"),
        })
    }
}

impl Display for Layout {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.code())
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(code: &str) -> Result<Self> {
        match code {
            "lhe" => Ok(Self::LanguageHoleExtension),
            "hle" => Ok(Self::HoleLanguageExtension),
            "hse" => Ok(Self::HoleSolutionExtension),
            "he" => Ok(Self::HoleExtension),
            other => Err(LayoutError::UnknownLayout(other.into())),
        }
    }
}

/// Layout resolution error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Language identifier missing from language table.
    #[error("unknown language {0:?}")]
    UnknownLanguage(String),

    /// Layout code is not one of "lhe", "hle", "hse", or "he".
    #[error("unknown layout {0:?}")]
    UnknownLayout(String),
}

/// Friendly result alias :3
pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
