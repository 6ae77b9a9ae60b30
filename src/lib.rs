//! bpctl: manage the buildpacks attached to an app and inspect its CI runs.
//!
//! The buildpack core lives in [`buildpack`]: [`buildpack::Resolver`] turns
//! user input into canonical URLs, [`buildpack::mutate`] computes new lists,
//! and [`buildpack::BuildpackCommand`] ties them to the platform API.

pub mod buildpack;
pub mod ci;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod output;
pub mod platform;
pub mod registry;

#[cfg(test)]
mod test_utils;

pub use cli::{Cli, Commands};
pub use error::{ApiError, BuildpackError, CiError, ConfigError, ResolveError};
