// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use golfsync::{
    apply, plan,
    snapshot::{Git2Snapshot, Snapshot},
    Export, Layout, MirrorOptions,
};

use anyhow::Result;
use git2::{Repository, RepositoryInitOptions};
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(crate) struct RepoFixture {
    repo: Repository,
}

impl RepoFixture {
    pub(crate) fn new(path: impl AsRef<Path>) -> Result<Self> {
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(path.as_ref(), &opts)?;

        // INVARIANT: Always provide valid name and email.
        //   - Git will complain if this is not set in CI/CD environments.
        let mut config = repo.config()?;
        config.set_str("user.name", "John Doe")?;
        config.set_str("user.email", "john@doe.com")?;

        Ok(Self { repo })
    }

    pub(crate) fn workdir(&self) -> PathBuf {
        self.repo.workdir().map(Path::to_path_buf).unwrap()
    }

    pub(crate) fn stage_and_commit(
        &self,
        filename: impl AsRef<Path>,
        contents: impl AsRef<str>,
    ) -> Result<()> {
        fs::write(self.workdir().join(filename.as_ref()), contents.as_ref())?;

        // INVARIANT: Always use new tree produced by index after staging new entry.
        let mut index = self.repo.index()?;
        index.add_path(filename.as_ref())?;
        index.write()?;
        let tree_oid = index.write_tree()?;
        let tree = self.repo.find_tree(tree_oid)?;

        // INVARIANT: Always determine latest parent commits to append to.
        let signature = self.repo.signature()?;
        let mut parents = Vec::new();
        if let Some(parent) = self.repo.head().ok().map(|head| head.target().unwrap()) {
            parents.push(self.repo.find_commit(parent)?);
        }
        let parents = parents.iter().collect::<Vec<_>>();

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            format!("chore: add {:?}", filename.as_ref()).as_ref(),
            &tree,
            &parents,
        )?;

        Ok(())
    }

    pub(crate) fn head_message(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.message().unwrap_or_default().to_string())
    }

    pub(crate) fn head_file(&self, path: impl AsRef<Path>) -> Result<Option<String>> {
        let tree = self.repo.head()?.peel_to_tree()?;
        let Ok(entry) = tree.get_path(path.as_ref()) else {
            return Ok(None);
        };
        let blob = self.repo.find_blob(entry.id())?;
        Ok(Some(String::from_utf8_lossy(blob.content()).into_owned()))
    }
}

fn export(solutions: &[(&str, &str, &str, &str, &str)]) -> Export {
    let records = solutions
        .iter()
        .map(|(hole, lang, scoring, submitted, code)| {
            format!(
                r#"{{"hole": "{hole}", "lang": "{lang}", "scoring": "{scoring}",
                    "submitted": "{submitted}T00:00:00Z", "code": "{code}"}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"solutions": [{records}]}}"#).parse().unwrap()
}

#[sealed_test]
fn mirror_and_commit() -> Result<()> {
    let fixture = RepoFixture::new("mirror")?;
    fixture.stage_and_commit("README.md", "# My golf solutions")?;

    let options = MirrorOptions {
        layout: Layout::LanguageHoleExtension,
        ..Default::default()
    };
    let first = export(&[
        ("fizz-buzz", "python", "bytes", "2024-01-01", "A"),
        ("fizz-buzz", "python", "chars", "2024-01-02", "A"),
        ("quine", "rust", "bytes", "2024-01-03", "R1"),
        ("quine", "rust", "chars", "2024-01-04", "R2"),
    ]);

    let planned = plan(&first, &options, "mirror")?;
    apply(&planned.changeset)?;
    Git2Snapshot::open("mirror")?.commit_snapshot("Update 2024-01-05")?;

    assert_eq!(fixture.head_message()?, "Update 2024-01-05");
    assert_eq!(fixture.head_file("python/fizz-buzz.py")?, Some("A".into()));
    assert_eq!(fixture.head_file("rust/quine-bytes.rs")?, Some("R1".into()));
    assert_eq!(fixture.head_file("rust/quine-chars.rs")?, Some("R2".into()));
    assert_eq!(
        fixture.head_file("README.md")?,
        Some("# My golf solutions".into())
    );

    // Nothing left to do on a second pass.
    assert!(plan(&first, &options, "mirror")?.is_up_to_date());

    // Rust solutions converge, python solution disappears.
    let second = export(&[
        ("quine", "rust", "bytes", "2024-02-01", "R3"),
        ("quine", "rust", "chars", "2024-02-01", "R3"),
    ]);
    let planned = plan(&second, &options, "mirror")?;
    assert_eq!(
        planned.changeset.to_delete,
        vec![
            PathBuf::from("mirror/python"),
            PathBuf::from("mirror/rust/quine-bytes.rs"),
            PathBuf::from("mirror/rust/quine-chars.rs"),
        ]
    );
    apply(&planned.changeset)?;
    Git2Snapshot::open("mirror")?.commit_snapshot("Update 2024-02-02")?;

    assert_eq!(fixture.head_file("python/fizz-buzz.py")?, None);
    assert_eq!(fixture.head_file("rust/quine-bytes.rs")?, None);
    assert_eq!(fixture.head_file("rust/quine.rs")?, Some("R3".into()));
    assert_eq!(
        fixture.head_file("README.md")?,
        Some("# My golf solutions".into())
    );
    assert!(Path::new("mirror/.git").is_dir());

    Ok(())
}

#[sealed_test]
fn type_conflict_without_deletion_leaves_tree_untouched() -> Result<()> {
    let fixture = RepoFixture::new("mirror")?;
    fixture.stage_and_commit("python", "not a directory")?;

    let options = MirrorOptions {
        delete: false,
        ..Default::default()
    };
    let solutions = export(&[("quine", "python", "bytes", "2024-01-01", "Q")]);
    assert!(plan(&solutions, &options, "mirror").is_err());
    assert_eq!(fs::read_to_string("mirror/python")?, "not a directory");

    let options = MirrorOptions {
        delete: true,
        ..options
    };
    let planned = plan(&solutions, &options, "mirror")?;
    apply(&planned.changeset)?;
    assert_eq!(fs::read_to_string("mirror/python/quine.py")?, "Q");

    Ok(())
}
