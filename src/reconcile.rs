// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Tree reconciliation.
//!
//! Aligns the target mapping with whatever already sits in the output
//! directory, and works out the [`Changeset`] that turns the latter into the
//! former.
//!
//! # Walking Two Trees
//!
//! Every target path is split into its segments. Starting at the output
//! root, target paths are grouped by their first remaining segment, and the
//! names of those groups are merged with the listing of the directory on
//! disk. Names are visited in sorted order, so the same inputs always yield
//! the same changeset. A name is one of three things:
//!
//! - __Needed directory__: every target path of the group continues past
//!   it. The directory is created if missing, and walked next with each
//!   target path advanced by one segment.
//! - __Needed file__: exactly one target path ends at it. The file is
//!   created if missing, or updated if its bytes differ from the target
//!   content. Identical files are left alone.
//! - __Extraneous entry__: nothing in the target mapping claims it. It is
//!   scheduled for deletion only if deletion is enabled, and its name is not
//!   on the [`IGNORED`] list.
//!
//! A needed name occupied by the wrong kind of entry is a type conflict. With
//! deletion enabled the occupant is deleted and the needed entry created in
//! its place. Otherwise reconciliation fails.
//!
//! Directories are listed lazily, one level at a time, and only when the walk
//! actually reaches them. Directories that are about to be created are never
//! listed at all.

use crate::state::TargetMapping;

use std::{
    collections::{BTreeMap, BTreeSet},
    ffi::{OsStr, OsString},
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Extraneous entries that are never deleted.
pub const IGNORED: &[&str] = &[".git", ".gitignore", ".github", "README.md", "LICENSE"];

/// File write scheduled by a changeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: PathBuf,
    pub content: String,
}

/// Filesystem operations needed to reach target mapping.
///
/// All four listings are disjoint, except that a path deleted for a type
/// conflict reappears as a directory or file creation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Changeset {
    /// Files and directories to delete.
    pub to_delete: Vec<PathBuf>,

    /// Directories to create, parents before children.
    pub directories_to_create: Vec<PathBuf>,

    /// New files.
    pub files_to_create: Vec<FileWrite>,

    /// Existing files whose content changes.
    pub files_to_update: Vec<FileWrite>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
            && self.directories_to_create.is_empty()
            && self.files_to_create.is_empty()
            && self.files_to_update.is_empty()
    }

    /// Total number of scheduled operations.
    pub fn len(&self) -> usize {
        self.to_delete.len()
            + self.directories_to_create.len()
            + self.files_to_create.len()
            + self.files_to_update.len()
    }
}

impl Display for Changeset {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let sections: [(&str, Vec<&Path>); 4] = [
            (
                "Files and directories that will be deleted:",
                self.to_delete.iter().map(PathBuf::as_path).collect(),
            ),
            (
                "Directories that will be created:",
                self.directories_to_create.iter().map(PathBuf::as_path).collect(),
            ),
            (
                "Files that will be updated:",
                self.files_to_update.iter().map(|w| w.path.as_path()).collect(),
            ),
            (
                "Files that will be created:",
                self.files_to_create.iter().map(|w| w.path.as_path()).collect(),
            ),
        ];

        for (heading, paths) in sections {
            if paths.is_empty() {
                continue;
            }

            writeln!(fmt, "{heading}")?;
            for path in paths {
                writeln!(fmt, "  {}", path.display())?;
            }
        }

        Ok(())
    }
}

/// Kind of entry found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    File,
    Directory,
    Other,
}

impl EntryKind {
    /// Probe path without following symbolic links.
    pub fn probe(path: &Path) -> std::io::Result<Self> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Self::Directory),
            Ok(meta) if meta.is_file() => Ok(Self::File),
            Ok(_) => Ok(Self::Other),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::Missing),
            Err(err) => Err(err),
        }
    }

    /// Probe path through symbolic links.
    ///
    /// A link to a file or directory counts as that file or directory. A
    /// dangling link counts as [`EntryKind::Other`].
    pub fn resolve(path: &Path) -> std::io::Result<Self> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Self::Directory),
            Ok(meta) if meta.is_file() => Ok(Self::File),
            Ok(_) => Ok(Self::Other),
            Err(err) if err.kind() == ErrorKind::NotFound => match Self::probe(path)? {
                Self::Missing => Ok(Self::Missing),
                _ => Ok(Self::Other),
            },
            Err(err) => Err(err),
        }
    }
}

impl Display for EntryKind {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::Missing => "nothing",
            Self::File => "file",
            Self::Directory => "directory",
            Self::Other => "special file",
        })
    }
}

/// Target path with the segments left to walk.
#[derive(Debug, Clone, Copy)]
struct Needed<'a> {
    segments: &'a [&'a str],
    content: &'a str,
}

impl<'a> Needed<'a> {
    fn head(&self) -> &'a str {
        self.segments[0]
    }

    fn advance(self) -> Self {
        Self {
            segments: &self.segments[1..],
            content: self.content,
        }
    }
}

/// Directory awaiting reconciliation.
struct Level<'a> {
    directory: PathBuf,

    /// Directory is scheduled for creation, so nothing exists below it.
    fresh: bool,
    children: Vec<Needed<'a>>,
}

/// Compute changeset that turns the tree at `root` into `target`.
///
/// A missing `root` is scheduled for creation as well.
///
/// # Errors
///
/// - Return [`ReconcileError::TypeConflict`] if a needed path is occupied
///   by the wrong kind of entry and deletion is disabled, or if `root`
///   itself is not a directory.
/// - Return [`ReconcileError::Probe`], [`ReconcileError::ReadDirectory`],
///   or [`ReconcileError::ReadFile`] if the existing tree cannot be
///   inspected.
///
/// # Panics
///
/// - Panics if two target paths claim the same file, or one target path
///   is a strict prefix of another. The target mapping never produces
///   either.
#[instrument(skip(target, root), fields(root = %root.as_ref().display()), level = "debug")]
pub fn reconcile(
    target: &TargetMapping,
    allow_delete: bool,
    root: impl AsRef<Path>,
) -> Result<Changeset> {
    let root = root.as_ref();
    let mut changeset = Changeset::default();

    let fresh = match resolve(root)? {
        EntryKind::Directory => false,
        EntryKind::Missing => {
            changeset.directories_to_create.push(root.to_path_buf());
            true
        }
        found => {
            return Err(ReconcileError::TypeConflict {
                path: root.to_path_buf(),
                expected: EntryKind::Directory,
                found,
            })
        }
    };

    let split = target
        .iter()
        .map(|(path, entry)| (path.split('/').collect::<Vec<_>>(), entry.content.as_str()))
        .collect::<Vec<_>>();
    let children = split
        .iter()
        .map(|(segments, content)| Needed {
            segments: segments.as_slice(),
            content: *content,
        })
        .collect::<Vec<_>>();

    let mut stack = vec![Level {
        directory: root.to_path_buf(),
        fresh,
        children,
    }];
    while let Some(level) = stack.pop() {
        let explore = reconcile_level(level, allow_delete, &mut changeset)?;

        // INVARIANT: Walk subdirectories depth-first in sorted order.
        stack.extend(explore.into_iter().rev());
    }

    debug!("{} operations scheduled", changeset.len());
    Ok(changeset)
}

fn reconcile_level<'a>(
    level: Level<'a>,
    allow_delete: bool,
    changeset: &mut Changeset,
) -> Result<Vec<Level<'a>>> {
    let mut needed: BTreeMap<OsString, Vec<Needed<'a>>> = BTreeMap::new();
    for child in level.children {
        needed.entry(child.head().into()).or_default().push(child);
    }

    let mut names = if level.fresh {
        BTreeSet::new()
    } else {
        list_directory(&level.directory)?
    };
    names.extend(needed.keys().cloned());

    let mut explore = Vec::new();
    for name in names {
        let path = level.directory.join(&name);

        // INVARIANT: Follow links for needed entries, never for extraneous ones.
        let Some(claims) = needed.remove(&name) else {
            if allow_delete && !is_ignored(&name) {
                debug!("extraneous {} {}", probe(&path)?, path.display());
                changeset.to_delete.push(path);
            }
            continue;
        };
        let found = if level.fresh {
            EntryKind::Missing
        } else {
            resolve(&path)?
        };

        if claims.iter().all(|claim| claim.segments.len() > 1) {
            let fresh = match found {
                EntryKind::Directory => false,
                EntryKind::Missing => {
                    changeset.directories_to_create.push(path.clone());
                    true
                }
                found => {
                    resolve_conflict(&path, EntryKind::Directory, found, allow_delete, changeset)?;
                    changeset.directories_to_create.push(path.clone());
                    true
                }
            };

            explore.push(Level {
                directory: path,
                fresh,
                children: claims.into_iter().map(Needed::advance).collect(),
            });
            continue;
        }

        assert!(
            claims.len() == 1 && claims[0].segments.len() == 1,
            "{} is claimed by more than one target path",
            path.display()
        );
        let write = FileWrite {
            path,
            content: claims[0].content.to_string(),
        };

        match found {
            EntryKind::Missing => changeset.files_to_create.push(write),
            EntryKind::File => {
                let current = fs::read(&write.path).map_err(|err| ReconcileError::ReadFile {
                    source: err,
                    path: write.path.clone(),
                })?;
                if current != write.content.as_bytes() {
                    changeset.files_to_update.push(write);
                }
            }
            found => {
                resolve_conflict(&write.path, EntryKind::File, found, allow_delete, changeset)?;
                changeset.files_to_create.push(write);
            }
        }
    }

    Ok(explore)
}

fn resolve_conflict(
    path: &Path,
    expected: EntryKind,
    found: EntryKind,
    allow_delete: bool,
    changeset: &mut Changeset,
) -> Result<()> {
    if !allow_delete {
        return Err(ReconcileError::TypeConflict {
            path: path.to_path_buf(),
            expected,
            found,
        });
    }

    debug!("replace {found} {} with {expected}", path.display());
    changeset.to_delete.push(path.to_path_buf());
    Ok(())
}

fn is_ignored(name: &OsStr) -> bool {
    IGNORED.iter().any(|ignored| OsStr::new(ignored) == name)
}

fn probe(path: &Path) -> Result<EntryKind> {
    EntryKind::probe(path).map_err(|err| ReconcileError::Probe {
        source: err,
        path: path.to_path_buf(),
    })
}

fn resolve(path: &Path) -> Result<EntryKind> {
    EntryKind::resolve(path).map_err(|err| ReconcileError::Probe {
        source: err,
        path: path.to_path_buf(),
    })
}

fn list_directory(directory: &Path) -> Result<BTreeSet<OsString>> {
    let read_error = |err| ReconcileError::ReadDirectory {
        source: err,
        path: directory.to_path_buf(),
    };

    let mut names = BTreeSet::new();
    for entry in fs::read_dir(directory).map_err(read_error)? {
        names.insert(entry.map_err(read_error)?.file_name());
    }

    Ok(names)
}

/// Tree reconciliation error types.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Needed path is occupied by the wrong kind of entry.
    #[error("{:?} must be a {expected}, but a {found} is in the way", path.display())]
    TypeConflict {
        path: PathBuf,
        expected: EntryKind,
        found: EntryKind,
    },

    /// Entry type cannot be determined.
    #[error("failed to inspect {:?}", path.display())]
    Probe {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Directory cannot be listed.
    #[error("failed to list directory {:?}", path.display())]
    ReadDirectory {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Existing file cannot be read for comparison.
    #[error("failed to read file {:?}", path.display())]
    ReadFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;
