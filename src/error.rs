use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid buildpack slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },
    #[error("{0} is not in the buildpack registry.")]
    NotFound(String),
    #[error("{}", unavailable_message(.status, .message))]
    RegistryUnavailable {
        status: Option<u16>,
        message: String,
    },
    #[error("invalid registry URL '{url}'")]
    InvalidRegistryUrl { url: String },
    #[error("could not build HTTP client: {0}")]
    Client(String),
}

fn unavailable_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("{status}: {message}"),
        None => message.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum BuildpackError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("The buildpack {0} is already set on your app.")]
    AlreadySet(String),
    #[error("Invalid index. Must be greater than 0.")]
    InvalidIndex,
    #[error("{}", out_of_range_message(.len))]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Buildpack not found. Nothing was removed.")]
    NotInList,
    #[error("No buildpacks were found. Next release on {app} will detect buildpacks normally.")]
    NoBuildpacks { app: String },
    #[error("Please choose either index or Buildpack, but not both.")]
    IndexAndBuildpack,
    #[error(
        "Usage: bpctl buildpacks remove [BUILDPACK_URL]. Must specify a buildpack to remove, either by index or URL."
    )]
    MissingTarget,
}

fn out_of_range_message(len: &usize) -> String {
    if *len == 1 {
        "Invalid index. Only valid value is 1.".to_string()
    } else {
        format!("Invalid index. Please choose a value between 1 and {len}")
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{status}: {message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("API key contains characters that cannot be sent in an HTTP header")]
    InvalidApiKey,
    #[error("invalid API URL '{url}'")]
    InvalidBaseUrl { url: String },
    #[error("could not build HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no API key found. Set HEROKU_API_KEY or add api.heroku.com to ~/.netrc")]
    MissingApiKey,
    #[error("no app specified. Use --app or run inside a checkout with a '{remote}' git remote")]
    MissingApp { remote: String },
}

#[derive(Debug, Error)]
pub enum CiError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("test node {node} not found. Available nodes: {}", available.join(", "))]
    NodeNotFound { node: u32, available: Vec<String> },
}
