// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Target state of the mirror.
//!
//! Folds the exported solution records into the __target mapping__: the set
//! of files the mirror must contain once synchronized, keyed by their
//! relative path.
//!
//! # Scoring Collapse
//!
//! A golfer often submits the exact same code for both scoring categories of
//! a hole. Solutions of one hole and language are grouped together, and the
//! number of distinct code strings in that group is its __diversity__. When
//! collapsing is enabled, no scoring filter is set, and the diversity is 1,
//! the scoring suffix is left out of the path so the group lands in a single
//! file instead of one file per category.
//!
//! # Latest Wins
//!
//! Records that resolve to the same path compete by submission time. A
//! record only replaces an existing entry if it was submitted strictly later.
//! On an exact tie the record encountered first keeps its place, so the
//! outcome follows the order code.golf returned the records in.

use crate::{
    layout::{Layout, LayoutError},
    record::{Record, Scoring},
};

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

/// Content destined for one file of the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File content.
    pub content: String,

    /// Submission time of the record the content came from.
    pub submitted: DateTime<Utc>,
}

/// Mapping of relative path to desired file content.
///
/// Paths are forward-slash separated, and each path appears at most once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetMapping {
    entries: BTreeMap<String, Entry>,
}

impl TargetMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer an entry for given path.
    ///
    /// Inserts the entry if the path is vacant, or if the entry was
    /// submitted strictly later than the one already present. Returns
    /// whether the entry was taken.
    pub fn offer(&mut self, path: impl Into<String>, entry: Entry) -> bool {
        let path = path.into();
        if let Some(existing) = self.entries.get(&path) {
            if entry.submitted <= existing.submitted {
                return false;
            }
        }

        self.entries.insert(path, entry);
        true
    }

    pub fn get(&self, path: impl AsRef<str>) -> Option<&Entry> {
        self.entries.get(path.as_ref())
    }

    /// Iterate entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .iter()
            .map(|(path, entry)| (path.as_str(), entry))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Entry)> for TargetMapping {
    fn from_iter<I: IntoIterator<Item = (String, Entry)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (path, entry) in iter {
            mapping.offer(path, entry);
        }
        mapping
    }
}

/// Fold records into target mapping.
///
/// # Errors
///
/// - Return [`StateError::Layout`] if any record uses an unknown language.
///   All records are checked before any path is resolved.
#[instrument(skip(records), level = "debug")]
pub fn aggregate(
    records: &[Record],
    layout: Layout,
    only_scoring: Option<Scoring>,
    collapse_scoring: bool,
) -> Result<TargetMapping> {
    let mut codes: HashMap<(&str, &str), HashSet<&str>> = HashMap::new();
    for record in records {
        layout.resolve(&record.hole, &record.lang, None)?;
        codes
            .entry((record.hole.as_str(), record.lang.as_str()))
            .or_default()
            .insert(record.code.as_str());
    }

    let mut mapping = TargetMapping::new();
    for record in records {
        if only_scoring.is_some_and(|only| only != record.scoring) {
            continue;
        }

        let diversity = codes
            .get(&(record.hole.as_str(), record.lang.as_str()))
            .map_or(0, HashSet::len);
        let scoring = if collapse_scoring && diversity == 1 && only_scoring.is_none() {
            None
        } else {
            Some(record.scoring)
        };

        let path = layout.resolve(&record.hole, &record.lang, scoring)?;
        let entry = Entry {
            content: record.code.clone(),
            submitted: record.submitted,
        };
        if !mapping.offer(&path, entry) {
            debug!("keep earlier claim on {path}");
        }
    }

    Ok(mapping)
}

/// Target state error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Record cannot be placed by layout.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Friendly result alias :3
pub type Result<T, E = StateError> = std::result::Result<T, E>;
