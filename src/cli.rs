//! CLI argument definitions for bpctl.
//!
//! Kept in the library so the command modules can name their own argument
//! types and the binary stays a thin dispatcher.

use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Debug, Parser)]
#[command(name = "bpctl")]
#[command(about = "Manage app buildpacks and inspect CI runs")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// App to run the command against
    #[arg(long, short = 'a', global = true, env = "HEROKU_APP")]
    pub app: Option<String>,

    /// Git remote used to find the app and in push hints (default: heroku)
    #[arg(long, short = 'r', global = true)]
    pub remote: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List or change the app's buildpacks
    ///
    /// Without a subcommand the current buildpacks are listed.
    Buildpacks(commands::buildpacks::BuildpacksArgs),

    /// Inspect CI test runs
    Ci(commands::ci::CiArgs),
}
