// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Version control snapshots.
//!
//! Once a changeset has been applied, the whole state of the mirror is
//! recorded as one commit. The output directory must be the top-level of a
//! Git work tree for this to work.

use chrono::NaiveDate;
use git2::{IndexAddOption, Oid, Repository};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Record current state of mirror.
pub trait Snapshot {
    /// Stage everything and commit it with given message.
    fn commit_snapshot(&self, message: &str) -> Result<Oid>;
}

/// Snapshots through libgit2.
pub struct Git2Snapshot {
    repository: Repository,
}

impl Git2Snapshot {
    /// Open repository whose work tree is `path`.
    ///
    /// Parent directories are not searched.
    ///
    /// # Errors
    ///
    /// - Return [`SnapshotError::NotARepository`] if `path` is not the
    ///   top-level of a Git work tree.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repository = Repository::open(path).map_err(|err| SnapshotError::NotARepository {
            source: err,
            path: path.to_path_buf(),
        })?;

        if repository.is_bare() {
            return Err(SnapshotError::Bare(path.to_path_buf()));
        }

        Ok(Self { repository })
    }
}

impl Snapshot for Git2Snapshot {
    /// Stage additions, modifications, and deletions across the entire work
    /// tree, honoring ignore rules, then commit to HEAD.
    #[instrument(skip(self), level = "debug")]
    fn commit_snapshot(&self, message: &str) -> Result<Oid> {
        let mut index = self.repository.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree_oid = index.write_tree()?;
        let tree = self.repository.find_tree(tree_oid)?;

        // INVARIANT: Append to current HEAD commit unless repository is empty.
        let signature = self.repository.signature()?;
        let mut parents = Vec::new();
        if let Some(oid) = self.repository.head().ok().and_then(|head| head.target()) {
            parents.push(self.repository.find_commit(oid)?);
        }
        let parents = parents.iter().collect::<Vec<_>>();

        let oid = self.repository.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        info!("committed {oid}: {message}");
        debug!("snapshot tree {tree_oid}");

        Ok(oid)
    }
}

/// Commit message for snapshot taken on given day.
pub fn snapshot_message(date: NaiveDate) -> String {
    format!("Update {}", date.format("%Y-%m-%d"))
}

/// Snapshot error types.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Output directory is not a Git work tree.
    #[error("output directory {:?} doesn't appear to be a git repository", path.display())]
    NotARepository {
        #[source]
        source: git2::Error,
        path: std::path::PathBuf,
    },

    /// Repository has no work tree.
    #[error("repository at {:?} is bare", .0.display())]
    Bare(std::path::PathBuf),

    /// Operations from libgit2 fail.
    #[error(transparent)]
    Git2(#[from] git2::Error),
}

/// Friendly result alias :3
pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;
