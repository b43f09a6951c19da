// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the configuration file that golfsync reads its
//! defaults from, to simplify the process of serialization and
//! deserialization. File I/O is left to the caller to figure out.

use crate::{layout::Layout, record::Scoring};

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Mirror configuration layout.
///
/// # General Layout
///
/// The configuration is composed of two parts: settings and account. The
/// settings section defines how solutions are laid out and synchronized.
/// The account section optionally holds the session used to fetch them.
/// Every field can be overridden from the command line.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct MirrorDefinition {
    /// Settings for the mirror.
    #[serde(default)]
    pub settings: MirrorSettings,

    /// Account to fetch solutions of.
    pub account: Option<AccountSettings>,
}

impl FromStr for MirrorDefinition {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut definition: MirrorDefinition =
            toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on output field.
        if let Some(output) = definition.settings.output.take() {
            definition.settings.output = Some(OutputRoot::new(
                shellexpand::full(output.to_string().as_str())
                    .map_err(ConfigError::ShellExpansion)?
                    .into_owned(),
            ));
        }

        Ok(definition)
    }
}

impl Display for MirrorDefinition {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Mirror settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MirrorSettings {
    /// Directory to mirror solutions into.
    pub output: Option<OutputRoot>,

    /// File layout of solutions.
    pub structure: Layout,

    /// Only keep solutions of this scoring category.
    pub only_scoring: Option<Scoring>,

    /// Drop scoring suffix when every category shares the same code.
    pub collapse_scoring: bool,

    /// Delete files and directories that no solution maps to.
    pub delete: bool,

    /// Commit the result to the output repository.
    pub git: bool,

    /// Ask for confirmation before touching the output directory.
    pub interactive: bool,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            output: None,
            structure: Layout::default(),
            only_scoring: None,
            collapse_scoring: true,
            delete: true,
            git: true,
            interactive: true,
        }
    }
}

/// Account settings.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct AccountSettings {
    /// Value of the code.golf session cookie.
    pub session: Option<String>,
}

/// Path acting as root of the mirror.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct OutputRoot(PathBuf);

impl OutputRoot {
    /// Construct new output root.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Treat output root as [`Path`] slice.
    pub fn as_path(&self) -> &Path {
        self.0.as_path()
    }
}

impl Display for OutputRoot {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_path().to_string_lossy().as_ref())
    }
}

/// Configuration error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}
