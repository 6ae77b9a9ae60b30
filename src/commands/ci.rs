//! `bpctl ci` subcommands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::ci::{self, PipelineSelector};
use crate::commands::Session;
use crate::output::Console;

#[derive(Debug, Args)]
pub struct CiArgs {
    #[command(subcommand)]
    pub action: CiAction,
}

#[derive(Debug, Subcommand)]
pub enum CiAction {
    /// Show the most recent test run
    Last {
        /// Pipeline name or id (defaults to the app's pipeline)
        #[arg(long, short = 'p')]
        pipeline: Option<String>,
        /// Only show this test node
        #[arg(long)]
        node: Option<u32>,
    },
}

pub fn run(args: CiArgs, session: &Session) -> Result<()> {
    match args.action {
        CiAction::Last { pipeline, node } => {
            let selector = match pipeline {
                Some(pipeline) => PipelineSelector::Named(pipeline),
                None => PipelineSelector::App(session.app()?),
            };
            let platform = session.platform()?;
            ci::last(&platform, &selector, node, &mut Console)?;
            Ok(())
        }
    }
}
