//! In-memory stand-ins for the platform, the registry and the terminal.

use crate::error::{ApiError, ResolveError};
use crate::output::Ui;
use crate::platform::{
    App, BuildpackInstallation, BuildpackRef, BuildpackUpdate, ConfigVars, Generation, OciImage,
    Pipeline, PipelineCoupling, PlatformApi, Release, TestNode, TestRun,
};
use crate::registry::RegistryLookup;
use std::cell::RefCell;
use std::collections::HashMap;

pub fn installation(url: &str, ordinal: usize) -> BuildpackInstallation {
    BuildpackInstallation {
        buildpack: BuildpackRef {
            url: url.to_string(),
            name: None,
        },
        ordinal,
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("Couldn't find that {what}."),
    }
}

#[derive(Default)]
pub struct FakePlatform {
    pub generation: Option<String>,
    pub installations: RefCell<Vec<BuildpackInstallation>>,
    pub releases: Vec<Release>,
    pub images: HashMap<String, Vec<OciImage>>,
    pub config_vars: ConfigVars,
    pub pipelines: Vec<Pipeline>,
    pub coupling: Option<PipelineCoupling>,
    pub test_runs: Vec<TestRun>,
    pub test_nodes: HashMap<String, Vec<TestNode>>,
    pub puts: RefCell<Vec<Vec<String>>>,
}

impl FakePlatform {
    pub fn classic(urls: &[&str]) -> Self {
        let installations = urls
            .iter()
            .enumerate()
            .map(|(ordinal, url)| installation(url, ordinal))
            .collect();
        Self {
            installations: RefCell::new(installations),
            ..Self::default()
        }
    }

    pub fn with_config_var(mut self, name: &str, value: &str) -> Self {
        self.config_vars
            .insert(name.to_string(), Some(value.to_string()));
        self
    }

    pub fn put_count(&self) -> usize {
        self.puts.borrow().len()
    }
}

impl PlatformApi for FakePlatform {
    fn app(&self, app: &str) -> Result<App, ApiError> {
        Ok(App {
            name: app.to_string(),
            generation: self.generation.clone().map(Generation::Name),
        })
    }

    fn buildpack_installations(&self, _app: &str) -> Result<Vec<BuildpackInstallation>, ApiError> {
        Ok(self.installations.borrow().clone())
    }

    fn replace_buildpack_installations(
        &self,
        _app: &str,
        updates: &[BuildpackUpdate],
    ) -> Result<Vec<BuildpackInstallation>, ApiError> {
        let urls: Vec<String> = updates.iter().map(|u| u.buildpack.clone()).collect();
        self.puts.borrow_mut().push(urls.clone());

        let installations: Vec<BuildpackInstallation> = urls
            .iter()
            .enumerate()
            .map(|(ordinal, url)| installation(url, ordinal))
            .collect();
        *self.installations.borrow_mut() = installations.clone();
        Ok(installations)
    }

    fn latest_releases(&self, _app: &str) -> Result<Vec<Release>, ApiError> {
        Ok(self.releases.clone())
    }

    fn oci_image(&self, _app: &str, image_id: &str) -> Result<Vec<OciImage>, ApiError> {
        self.images
            .get(image_id)
            .cloned()
            .ok_or_else(|| not_found("image"))
    }

    fn config_vars(&self, _app: &str) -> Result<ConfigVars, ApiError> {
        Ok(self.config_vars.clone())
    }

    fn pipeline(&self, pipeline: &str) -> Result<Pipeline, ApiError> {
        self.pipelines
            .iter()
            .find(|p| p.id == pipeline || p.name == pipeline)
            .cloned()
            .ok_or_else(|| not_found("pipeline"))
    }

    fn pipeline_coupling(&self, _app: &str) -> Result<PipelineCoupling, ApiError> {
        self.coupling.clone().ok_or_else(|| not_found("pipeline coupling"))
    }

    fn latest_test_runs(&self, _pipeline_id: &str) -> Result<Vec<TestRun>, ApiError> {
        Ok(self.test_runs.iter().take(1).cloned().collect())
    }

    fn test_run(&self, _pipeline_id: &str, number: u64) -> Result<TestRun, ApiError> {
        self.test_runs
            .iter()
            .find(|run| run.number == number)
            .cloned()
            .ok_or_else(|| not_found("test run"))
    }

    fn test_nodes(&self, test_run_id: &str) -> Result<Vec<TestNode>, ApiError> {
        Ok(self.test_nodes.get(test_run_id).cloned().unwrap_or_default())
    }
}

/// Registry that knows a fixed set of slugs and records every lookup.
#[derive(Default)]
pub struct FakeRegistry {
    pub known: HashMap<String, String>,
    pub lookups: RefCell<Vec<String>>,
}

impl FakeRegistry {
    pub fn with(slugs: &[(&str, &str)]) -> Self {
        Self {
            known: slugs
                .iter()
                .map(|(slug, url)| (slug.to_string(), url.to_string()))
                .collect(),
            lookups: RefCell::new(Vec::new()),
        }
    }
}

impl RegistryLookup for FakeRegistry {
    fn lookup(&self, slug: &str) -> Result<String, ResolveError> {
        self.lookups.borrow_mut().push(slug.to_string());
        self.known
            .get(slug)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(slug.to_string()))
    }
}

/// Captures everything a command writes.
#[derive(Debug, Default)]
pub struct Recorder {
    pub lines: Vec<String>,
    pub warnings: Vec<String>,
}

impl Ui for Recorder {
    fn log(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn warn(&mut self, line: &str) {
        self.warnings.push(line.to_string());
    }
}
