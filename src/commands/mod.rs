//! Command implementations behind the CLI surface.

pub mod buildpacks;
pub mod ci;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{ConfigError, ResolveError};
use crate::git::{self, DEFAULT_REMOTE};
use crate::platform::HttpPlatform;
use crate::registry::HttpRegistry;

/// Global options and loaded configuration shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub app: Option<String>,
    pub remote: Option<String>,
    pub config: Config,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            app: cli.app.clone(),
            remote: cli.remote.clone(),
            config: Config::load()?,
        })
    }

    pub fn remote(&self) -> &str {
        self.remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    /// The app named on the command line, or the one behind the git remote.
    pub fn app(&self) -> Result<String, ConfigError> {
        if let Some(app) = &self.app {
            return Ok(app.clone());
        }
        git::app_from_remote(self.remote()).ok_or_else(|| ConfigError::MissingApp {
            remote: self.remote().to_string(),
        })
    }

    pub fn platform(&self) -> anyhow::Result<HttpPlatform> {
        let key = self.config.api_key()?;
        Ok(HttpPlatform::new(self.config.api_url(), &key)?)
    }

    pub fn registry(&self) -> Result<HttpRegistry, ResolveError> {
        HttpRegistry::with_base(self.config.registry_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(app: Option<&str>, remote: Option<&str>) -> Session {
        Session {
            app: app.map(str::to_string),
            remote: remote.map(str::to_string),
            config: Config::default(),
        }
    }

    #[test]
    fn test_explicit_app_wins() {
        assert_eq!(session(Some("demo"), None).app().expect("app"), "demo");
    }

    #[test]
    fn test_remote_defaults_to_heroku() {
        assert_eq!(session(None, None).remote(), "heroku");
        assert_eq!(session(None, Some("staging")).remote(), "staging");
    }

    #[test]
    fn test_platform_uses_configured_key() {
        let mut session = session(Some("demo"), None);
        session.config.api_key = Some("secret".to_string());
        assert!(session.platform().is_ok());
    }

    #[test]
    fn test_platform_rejects_key_with_newline() {
        let mut session = session(Some("demo"), None);
        session.config.api_key = Some("secret\nX-Injected: 1".to_string());
        let err = session.platform().err().expect("error");
        assert_eq!(
            err.to_string(),
            "API key contains characters that cannot be sent in an HTTP header"
        );
    }

    #[test]
    fn test_registry_rejects_bad_url() {
        let mut session = session(Some("demo"), None);
        session.config.registry_url = Some("registry".to_string());
        assert!(session.registry().is_err());
    }
}
