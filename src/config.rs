//! Client configuration.
//!
//! Settings come from an optional JSON file, then environment variables,
//! with the API key falling back to the user's `~/.netrc`.

use crate::error::ConfigError;
use crate::platform::DEFAULT_API_URL;
use crate::registry::DEFAULT_REGISTRY_URL;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "BPCTL_CONFIG";
pub const API_URL_ENV: &str = "HEROKU_API_URL";
pub const API_KEY_ENV: &str = "HEROKU_API_KEY";
pub const REGISTRY_URL_ENV: &str = "BUILDPACK_REGISTRY_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub registry_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path);

        let config = match path {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };

        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        let base = dirs::config_dir()?;
        Some(base.join("bpctl").join("config.json"))
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get(API_URL_ENV) {
            self.api_url = Some(url);
        }
        if let Some(url) = get(REGISTRY_URL_ENV) {
            self.registry_url = Some(url);
        }
        if let Some(key) = get(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn registry_url(&self) -> &str {
        self.registry_url.as_deref().unwrap_or(DEFAULT_REGISTRY_URL)
    }

    /// The configured API key, or the netrc password for the API host.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }

        let netrc = dirs::home_dir()
            .map(|home| home.join(".netrc"))
            .ok_or(ConfigError::MissingApiKey)?;
        self.api_key_from_netrc(&netrc)?
            .ok_or(ConfigError::MissingApiKey)
    }

    fn api_key_from_netrc(&self, path: &Path) -> Result<Option<String>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let Some(host) = self.api_host() else {
            return Ok(None);
        };
        let content = fs::read_to_string(path)?;
        Ok(netrc_password(&content, &host))
    }

    fn api_host(&self) -> Option<String> {
        Url::parse(self.api_url())
            .ok()?
            .host_str()
            .map(str::to_string)
    }
}

/// The `password` recorded for `machine` in netrc-formatted `content`.
pub fn netrc_password(content: &str, machine: &str) -> Option<String> {
    let mut tokens = content.split_whitespace();
    let mut matched = false;

    while let Some(token) = tokens.next() {
        match token {
            "machine" => matched = tokens.next() == Some(machine),
            "default" => matched = false,
            "password" => {
                let password = tokens.next();
                if matched {
                    return password.map(str::to_string);
                }
            }
            _ => {}
        }
    }

    None
}
