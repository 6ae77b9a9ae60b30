//! `bpctl buildpacks` subcommands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::buildpack::BuildpackCommand;
use crate::commands::Session;
use crate::output::Console;

#[derive(Debug, Args)]
pub struct BuildpacksArgs {
    #[command(subcommand)]
    pub action: Option<BuildpacksAction>,
}

#[derive(Debug, Subcommand)]
pub enum BuildpacksAction {
    /// Show the app's buildpacks in build order
    List,
    /// Add a buildpack, at the end or before the entry at --index
    Add {
        /// Registry name (namespace/name) or URL of the buildpack
        buildpack: String,
        /// 1-based position to insert at
        #[arg(long, short = 'i', allow_hyphen_values = true)]
        index: Option<String>,
    },
    /// Replace the buildpack at --index (default 1)
    Set {
        /// Registry name (namespace/name) or URL of the buildpack
        buildpack: String,
        /// 1-based position to replace
        #[arg(long, short = 'i', allow_hyphen_values = true)]
        index: Option<String>,
    },
    /// Remove a buildpack by name/URL or by --index
    Remove {
        /// Registry name (namespace/name) or URL of the buildpack
        buildpack: Option<String>,
        /// 1-based position to remove
        #[arg(long, short = 'i', allow_hyphen_values = true)]
        index: Option<String>,
    },
    /// Remove every buildpack from the app
    Clear,
}

pub fn run(args: BuildpacksArgs, session: &Session) -> Result<()> {
    let app = session.app()?;
    let platform = session.platform()?;
    let registry = session.registry()?;
    let command = BuildpackCommand::new(&platform, &registry);
    let remote = session.remote.as_deref();
    let mut ui = Console;

    tracing::debug!(app = %app, action = ?args.action, "running buildpacks command");

    match args.action.unwrap_or(BuildpacksAction::List) {
        BuildpacksAction::List => {
            command.list(&app, &mut ui)?;
        }
        BuildpacksAction::Add { buildpack, index } => {
            command.add(&app, remote, &buildpack, index.as_deref(), &mut ui)?;
        }
        BuildpacksAction::Set { buildpack, index } => {
            command.set(&app, remote, &buildpack, index.as_deref(), &mut ui)?;
        }
        BuildpacksAction::Remove { buildpack, index } => {
            command.remove(
                &app,
                remote,
                buildpack.as_deref(),
                index.as_deref(),
                &mut ui,
            )?;
        }
        BuildpacksAction::Clear => {
            command.clear(&app, &mut ui)?;
        }
    }
    Ok(())
}
