// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Changeset application.
//!
//! Executes a [`Changeset`] against the filesystem in a fixed order:
//!
//! 1. Deletions, clearing the way for entries that change type.
//! 2. Directory creations, one level at a time. Parents always precede their
//!    children in the changeset.
//! 3. File updates.
//! 4. File creations.
//!
//! There is no rollback. The first failing operation aborts the rest, and
//! leaves a partially applied tree behind. Reconciling again picks up
//! whatever remains.

use crate::reconcile::{Changeset, EntryKind};

use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Apply changeset to filesystem.
///
/// # Errors
///
/// - Return [`ApplyError::Delete`] if a file or directory cannot be deleted.
/// - Return [`ApplyError::CreateDirectory`] if a directory cannot be
///   created.
/// - Return [`ApplyError::Write`] if a file cannot be written.
#[instrument(skip(changeset), fields(operations = changeset.len()), level = "debug")]
pub fn apply(changeset: &Changeset) -> Result<()> {
    for path in &changeset.to_delete {
        delete(path)?;
    }

    for path in &changeset.directories_to_create {
        debug!("create directory {}", path.display());
        fs::create_dir(path).map_err(|err| ApplyError::CreateDirectory {
            source: err,
            path: path.clone(),
        })?;
    }

    for write in changeset
        .files_to_update
        .iter()
        .chain(changeset.files_to_create.iter())
    {
        debug!("write {}", write.path.display());
        fs::write(&write.path, write.content.as_bytes()).map_err(|err| ApplyError::Write {
            source: err,
            path: write.path.clone(),
        })?;
    }

    Ok(())
}

fn delete(path: &Path) -> Result<()> {
    let delete_error = |err| ApplyError::Delete {
        source: err,
        path: path.to_path_buf(),
    };

    // INVARIANT: Never follow symbolic links, only remove the link itself.
    match EntryKind::probe(path).map_err(delete_error)? {
        EntryKind::Directory => {
            debug!("delete directory {}", path.display());
            fs::remove_dir_all(path).map_err(delete_error)
        }
        EntryKind::Missing => {
            debug!("{} already gone", path.display());
            Ok(())
        }
        _ => {
            debug!("delete file {}", path.display());
            fs::remove_file(path).map_err(delete_error)
        }
    }
}

/// Changeset application error types.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// File or directory cannot be deleted.
    #[error("failed to delete {:?}", path.display())]
    Delete {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Directory cannot be created.
    #[error("failed to create directory {:?}", path.display())]
    CreateDirectory {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be written to.
    #[error("failed to write file {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ApplyError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::FileWrite;

    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test]
    fn apply_in_order() -> anyhow::Result<()> {
        fs::create_dir_all("out/stale")?;
        fs::write("out/stale/old.py", "old")?;
        fs::write("out/rust", "file in the way")?;
        fs::write("out/quine.py", "old")?;

        let changeset = Changeset {
            to_delete: vec!["out/stale".into(), "out/rust".into()],
            directories_to_create: vec!["out/rust".into(), "out/rust/nested".into()],
            files_to_create: vec![FileWrite {
                path: "out/rust/nested/quine.rs".into(),
                content: "fn main(){}".into(),
            }],
            files_to_update: vec![FileWrite {
                path: "out/quine.py".into(),
                content: "new".into(),
            }],
        };
        apply(&changeset)?;

        assert!(!Path::new("out/stale").exists());
        assert!(Path::new("out/rust").is_dir());
        assert_eq!(fs::read_to_string("out/rust/nested/quine.rs")?, "fn main(){}");
        assert_eq!(fs::read_to_string("out/quine.py")?, "new");

        Ok(())
    }

    #[sealed_test]
    fn abort_on_first_failure() -> anyhow::Result<()> {
        fs::create_dir("out")?;
        let changeset = Changeset {
            directories_to_create: vec!["out/missing/parent".into()],
            files_to_create: vec![FileWrite {
                path: "out/never.py".into(),
                content: "x".into(),
            }],
            ..Default::default()
        };

        let result = apply(&changeset);
        assert!(matches!(
            result,
            Err(ApplyError::CreateDirectory { ref path, .. }) if path == Path::new("out/missing/parent")
        ));
        assert!(!Path::new("out/never.py").exists());

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn delete_symlink_without_following() -> anyhow::Result<()> {
        fs::create_dir_all("keep")?;
        fs::write("keep/precious.txt", "x")?;
        fs::create_dir("out")?;
        std::os::unix::fs::symlink("../keep", "out/link")?;

        let changeset = Changeset {
            to_delete: vec!["out/link".into()],
            ..Default::default()
        };
        apply(&changeset)?;

        assert!(!Path::new("out/link").exists());
        assert!(Path::new("keep/precious.txt").exists());

        Ok(())
    }
}
