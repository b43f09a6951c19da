// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Synchronization planning.
//!
//! Ties aggregation and reconciliation together: given an export and the
//! options of a run, produce the target mapping along with the changeset
//! needed to reach it. Nothing on disk is modified while planning.

use crate::{
    config::MirrorSettings,
    layout::Layout,
    reconcile::{reconcile, Changeset, ReconcileError},
    record::{Export, Scoring},
    state::{aggregate, StateError, TargetMapping},
};

use std::path::Path;
use tracing::{info, instrument};

/// Options controlling a synchronization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorOptions {
    pub layout: Layout,
    pub only_scoring: Option<Scoring>,
    pub collapse_scoring: bool,
    pub delete: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self::from(&MirrorSettings::default())
    }
}

impl From<&MirrorSettings> for MirrorOptions {
    fn from(settings: &MirrorSettings) -> Self {
        Self {
            layout: settings.structure,
            only_scoring: settings.only_scoring,
            collapse_scoring: settings.collapse_scoring,
            delete: settings.delete,
        }
    }
}

/// Planned synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Files the mirror should hold.
    pub target: TargetMapping,

    /// Operations to get there.
    pub changeset: Changeset,
}

impl Plan {
    pub fn is_up_to_date(&self) -> bool {
        self.changeset.is_empty()
    }
}

/// Plan synchronization of export into `root`.
///
/// # Errors
///
/// - Return [`MirrorError::State`] if the export cannot be laid out.
/// - Return [`MirrorError::Reconcile`] if the existing tree conflicts with
///   the target mapping, or cannot be inspected.
#[instrument(skip(export, root), level = "debug")]
pub fn plan(export: &Export, options: &MirrorOptions, root: impl AsRef<Path>) -> Result<Plan> {
    info!("computing diff");
    let target = aggregate(
        &export.solutions,
        options.layout,
        options.only_scoring,
        options.collapse_scoring,
    )?;
    info!("{} solution files in target state", target.len());

    let changeset = reconcile(&target, options.delete, root)?;

    Ok(Plan { target, changeset })
}

/// Planning error types.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Target mapping cannot be computed.
    #[error(transparent)]
    State(#[from] StateError),

    /// Changeset cannot be computed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Friendly result alias :3
pub type Result<T, E = MirrorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::FileWrite;

    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::{fs, path::PathBuf};

    fn export(codes: [&str; 2]) -> Export {
        format!(
            r#"{{"solutions": [
                {{"hole": "fizz-buzz", "lang": "python", "scoring": "bytes",
                  "submitted": "2024-01-01T00:00:00Z", "code": "{}"}},
                {{"hole": "fizz-buzz", "lang": "python", "scoring": "chars",
                  "submitted": "2024-01-02T00:00:00Z", "code": "{}"}}
            ]}}"#,
            codes[0], codes[1]
        )
        .parse()
        .unwrap()
    }

    #[sealed_test]
    fn plan_collapsed_solutions() -> anyhow::Result<()> {
        fs::create_dir("out")?;
        let options = MirrorOptions {
            layout: Layout::HoleLanguageExtension,
            ..Default::default()
        };

        let result = plan(&export(["A", "A"]), &options, "out")?;
        assert_eq!(
            result.changeset,
            Changeset {
                directories_to_create: vec![PathBuf::from("out/fizz-buzz")],
                files_to_create: vec![FileWrite {
                    path: "out/fizz-buzz/python.py".into(),
                    content: "A".into(),
                }],
                ..Default::default()
            }
        );

        Ok(())
    }

    #[sealed_test]
    fn plan_diverse_solutions() -> anyhow::Result<()> {
        fs::create_dir("out")?;
        let options = MirrorOptions {
            layout: Layout::HoleLanguageExtension,
            ..Default::default()
        };

        let result = plan(&export(["A", "B"]), &options, "out")?;
        assert_eq!(
            result.changeset.files_to_create,
            vec![
                FileWrite {
                    path: "out/fizz-buzz/python-bytes.py".into(),
                    content: "A".into(),
                },
                FileWrite {
                    path: "out/fizz-buzz/python-chars.py".into(),
                    content: "B".into(),
                },
            ]
        );

        Ok(())
    }

    #[sealed_test]
    fn switching_layout_replaces_tree() -> anyhow::Result<()> {
        fs::create_dir_all("out/python")?;
        fs::write("out/python/fizz-buzz.py", "A")?;
        fs::write("out/README.md", "my golf")?;

        let options = MirrorOptions {
            layout: Layout::HoleExtension,
            ..Default::default()
        };
        let result = plan(&export(["A", "A"]), &options, "out")?;
        assert_eq!(result.changeset.to_delete, vec![PathBuf::from("out/python")]);
        assert_eq!(
            result.changeset.files_to_create,
            vec![FileWrite {
                path: "out/fizz-buzz.py".into(),
                content: "A".into(),
            }]
        );

        let options = MirrorOptions {
            delete: false,
            ..options
        };
        let result = plan(&export(["A", "A"]), &options, "out")?;
        assert!(result.changeset.to_delete.is_empty());

        Ok(())
    }
}
