//! The platform API as consumed by the commands.

use crate::error::ApiError;

pub mod http;
mod models;

pub use http::{DEFAULT_API_URL, HttpPlatform};
pub(crate) use models::BuildpackUpdates;
pub use models::{
    App, BuildpackInstallation, BuildpackRef, BuildpackUpdate, ConfigVars, Generation, OciBuildpack,
    OciImage, OciImageRef, Pipeline, PipelineCoupling, Release, TestNode, TestRun,
};

pub trait PlatformApi {
    fn app(&self, app: &str) -> Result<App, ApiError>;

    fn buildpack_installations(&self, app: &str) -> Result<Vec<BuildpackInstallation>, ApiError>;

    /// Replace the app's whole buildpack list, returning what the server kept.
    fn replace_buildpack_installations(
        &self,
        app: &str,
        updates: &[BuildpackUpdate],
    ) -> Result<Vec<BuildpackInstallation>, ApiError>;

    /// Newest releases first.
    fn latest_releases(&self, app: &str) -> Result<Vec<Release>, ApiError>;

    fn oci_image(&self, app: &str, image_id: &str) -> Result<Vec<OciImage>, ApiError>;

    fn config_vars(&self, app: &str) -> Result<ConfigVars, ApiError>;

    fn pipeline(&self, pipeline: &str) -> Result<Pipeline, ApiError>;

    fn pipeline_coupling(&self, app: &str) -> Result<PipelineCoupling, ApiError>;

    /// Newest test run first; at most one is requested.
    fn latest_test_runs(&self, pipeline_id: &str) -> Result<Vec<TestRun>, ApiError>;

    fn test_run(&self, pipeline_id: &str, number: u64) -> Result<TestRun, ApiError>;

    fn test_nodes(&self, test_run_id: &str) -> Result<Vec<TestNode>, ApiError>;
}
