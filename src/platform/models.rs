use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub name: String,
    #[serde(default)]
    pub generation: Option<Generation>,
}

impl App {
    pub fn generation_name(&self) -> Option<&str> {
        self.generation.as_ref().map(Generation::name)
    }
}

/// App generation, sent either as a bare name or as `{ "name": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Generation {
    Name(String),
    Object { name: String },
}

impl Generation {
    pub fn name(&self) -> &str {
        match self {
            Generation::Name(name) => name,
            Generation::Object { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildpackInstallation {
    pub buildpack: BuildpackRef,
    pub ordinal: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildpackRef {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildpackUpdate {
    pub buildpack: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BuildpackUpdates<'a> {
    pub updates: &'a [BuildpackUpdate],
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub oci_image: Option<OciImageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OciImageRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OciImage {
    #[serde(default)]
    pub buildpacks: Vec<OciBuildpack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OciBuildpack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

pub type ConfigVars = HashMap<String, Option<String>>;

#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineCoupling {
    pub pipeline: Pipeline,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestRun {
    pub id: String,
    pub number: u64,
    pub status: String,
    #[serde(default)]
    pub commit_branch: Option<String>,
    #[serde(default)]
    pub commit_sha: Option<String>,
    #[serde(default)]
    pub commit_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestNode {
    pub index: u32,
    pub status: String,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub output_stream_url: Option<String>,
}
