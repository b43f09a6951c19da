// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Mirror code.golf solutions into a Git repository.
//!
//! Golfsync fetches every solution a golfer submitted to code.golf, lays
//! them out as files under an output directory, and commits the result.
//! A run goes through the following stages:
//!
//! 1. [`state`]: fold exported records into the target mapping of relative
//!    path to file content, placing files through a [`layout`].
//! 2. [`reconcile`]: compare the target mapping against the output
//!    directory, and compute the [`Changeset`] that makes them equal.
//! 3. [`apply`]: execute the changeset.
//! 4. [`snapshot`]: commit the new state of the output directory.
//!
//! Fetching the export ([`fetch`]), user confirmation, and the command-line
//! surface wrap around these stages.

pub mod apply;
pub mod config;
pub mod fetch;
pub mod language;
pub mod layout;
pub mod mirror;
pub mod path;
pub mod reconcile;
pub mod record;
pub mod snapshot;
pub mod state;

pub use apply::apply;
pub use layout::Layout;
pub use mirror::{plan, MirrorOptions, Plan};
pub use reconcile::{reconcile, Changeset};
pub use record::{Export, Record, Scoring};
pub use state::{aggregate, TargetMapping};
