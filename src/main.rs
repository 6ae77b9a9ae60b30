use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bpctl::commands::{self, Session};
use bpctl::output::Output;
use bpctl::{Cli, Commands};

fn main() {
    // RUST_LOG=bpctl=debug for request-level detail
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        Output::error(err.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let session = Session::from_cli(&cli)?;

    match cli.command {
        Commands::Buildpacks(args) => commands::buildpacks::run(args, &session),
        Commands::Ci(args) => commands::ci::run(args, &session),
    }
}
