// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use golfsync::{
    apply,
    config::{AccountSettings, MirrorDefinition, OutputRoot},
    fetch::{fetch_export, load_export, Session},
    path::default_config_path,
    plan,
    snapshot::{snapshot_message, Git2Snapshot, Snapshot},
    Export, Layout, MirrorOptions, Scoring,
};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;
use std::{
    fs::{create_dir_all, read_to_string, write},
    path::PathBuf,
    process::exit,
    time::Duration,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "golfsync [options] <golfsync-command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    async fn run(self) -> Result<()> {
        match self.command {
            Command::Sync(opts) => run_sync(self.config, opts).await,
            Command::Init(opts) => run_init(self.config, opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Mirror solutions into output repository.
    #[command(override_usage = "golfsync sync [options]")]
    Sync(SyncOptions),

    /// Write default configuration file.
    #[command(override_usage = "golfsync init [options]")]
    Init(InitOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SyncOptions {
    /// Value of the code.golf session cookie.
    #[arg(short, long, value_name = "uuid")]
    pub session: Option<String>,

    /// Output repository path.
    #[arg(short, long, value_name = "path")]
    pub output: Option<PathBuf>,

    /// File structure to lay solutions out with.
    #[arg(long, value_name = "layout")]
    pub structure: Option<Layout>,

    /// Only keep solutions of this scoring category.
    #[arg(long, value_name = "scoring")]
    pub only_scoring: Option<Scoring>,

    /// Keep scoring suffix even when every category shares the same code.
    #[arg(long)]
    pub always_scoring_name: bool,

    /// Modify files without committing them.
    #[arg(long)]
    pub no_git: bool,

    /// Never delete files or directories.
    #[arg(long)]
    pub no_delete: bool,

    /// Skip confirmation prompt.
    #[arg(long)]
    pub no_interactive: bool,

    /// Preview changes without applying them.
    #[arg(long)]
    pub dry_run: bool,

    /// Read solutions from saved export instead of fetching them.
    #[arg(short, long, value_name = "path")]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct InitOptions {
    /// Output repository path.
    #[arg(short, long, value_name = "path")]
    pub output: Option<PathBuf>,

    /// File structure to lay solutions out with.
    #[arg(long, value_name = "layout")]
    pub structure: Option<Layout>,

    /// Value of the code.golf session cookie.
    #[arg(short, long, value_name = "uuid")]
    pub session: Option<String>,
}

#[tokio::main]
async fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run().await {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

async fn run() -> Result<()> {
    Cli::parse().run().await
}

async fn run_sync(config: Option<PathBuf>, opts: SyncOptions) -> Result<()> {
    let definition = load_definition(config)?;
    let mut settings = definition.settings;
    if let Some(structure) = opts.structure {
        settings.structure = structure;
    }
    if opts.only_scoring.is_some() {
        settings.only_scoring = opts.only_scoring;
    }
    settings.collapse_scoring &= !opts.always_scoring_name;
    settings.git &= !opts.no_git;
    settings.delete &= !opts.no_delete;
    settings.interactive &= !opts.no_interactive;

    let output = opts
        .output
        .map(OutputRoot::new)
        .or(settings.output.clone())
        .ok_or_else(|| anyhow!("no output directory, pass --output or set settings.output"))?;

    // INVARIANT: Make sure commit can happen before fetching anything.
    let snapshot = if settings.git {
        Some(Git2Snapshot::open(output.as_path())?)
    } else {
        None
    };

    let export = match opts.export {
        Some(path) => load_export(path)?,
        None => {
            let session = opts
                .session
                .or(definition.account.and_then(|account| account.session))
                .ok_or_else(|| anyhow!("no session, pass --session or set account.session"))?
                .parse::<Session>()?;
            fetch_with_spinner(&session).await?
        }
    };

    let plan = plan(&export, &MirrorOptions::from(&settings), output.as_path())?;
    if plan.is_up_to_date() {
        info!("everything is already up to date");
        return Ok(());
    }

    info!("pending changes:\n{}", plan.changeset);
    if settings.interactive
        && !Confirm::new("Would you like to proceed?")
            .with_default(false)
            .prompt()?
    {
        bail!("aborted, {} left untouched", output);
    }

    info!("updating files");
    if !opts.dry_run {
        apply(&plan.changeset)?;
    }

    if let Some(snapshot) = snapshot {
        info!("committing changes");
        if !opts.dry_run {
            snapshot.commit_snapshot(&snapshot_message(Local::now().date_naive()))?;
        }
    }

    info!("done");

    Ok(())
}

fn run_init(config: Option<PathBuf>, opts: InitOptions) -> Result<()> {
    let path = match config {
        Some(path) => path,
        None => default_config_path()?,
    };
    if path.exists() {
        bail!("configuration file {:?} already exists", path.display());
    }

    let mut definition = MirrorDefinition::default();
    definition.settings.output = opts.output.map(OutputRoot::new);
    if let Some(structure) = opts.structure {
        definition.settings.structure = structure;
    }
    definition.account = opts.session.map(|session| AccountSettings {
        session: Some(session),
    });

    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .with_context(|| format!("failed to create {:?}", parent.display()))?;
    }
    write(&path, definition.to_string())
        .with_context(|| format!("failed to write {:?}", path.display()))?;
    info!("wrote configuration to {}", path.display());

    Ok(())
}

fn load_definition(config: Option<PathBuf>) -> Result<MirrorDefinition> {
    let (path, explicit) = match config {
        Some(path) => (path, true),
        None => (default_config_path()?, false),
    };

    if !explicit && !path.exists() {
        return Ok(MirrorDefinition::default());
    }

    let data = read_to_string(&path)
        .with_context(|| format!("failed to read configuration {:?}", path.display()))?;
    let definition = data
        .parse::<MirrorDefinition>()
        .with_context(|| format!("invalid configuration {:?}", path.display()))?;

    Ok(definition)
}

async fn fetch_with_spinner(session: &Session) -> Result<Export> {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{elapsed_precise:.green}  {msg:<50}  {spinner:.yellow}")?
        .tick_chars("-Cco. ");
    bar.set_style(style);
    bar.set_message("exporting solutions");
    bar.enable_steady_tick(Duration::from_millis(100));

    let export = fetch_export(session).await;
    bar.finish_and_clear();

    Ok(export?)
}
