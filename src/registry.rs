//! Buildpack registry lookups.

use crate::error::ResolveError;
use reqwest::{StatusCode, Url};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

pub const DEFAULT_REGISTRY_URL: &str = "https://buildpack-registry.heroku.com";

const REGISTRY_ACCEPT: &str = "application/vnd.heroku+json; version=3.buildpack-registry";

/// Resolves a registry slug to the location of its published blob.
pub trait RegistryLookup {
    fn lookup(&self, slug: &str) -> Result<String, ResolveError>;
}

pub struct HttpRegistry {
    base: Url,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct RegistryBuildpack {
    blob_url: String,
}

impl HttpRegistry {
    pub fn with_base(base: &str) -> Result<Self, ResolveError> {
        let invalid = || ResolveError::InvalidRegistryUrl {
            url: base.to_string(),
        };
        let parsed = Url::parse(base).map_err(|_| invalid())?;
        if parsed.cannot_be_a_base() {
            return Err(invalid());
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("bpctl"));
        headers.insert(ACCEPT, HeaderValue::from_static(REGISTRY_ACCEPT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| ResolveError::Client(err.to_string()))?;

        Ok(Self {
            base: parsed,
            client,
        })
    }

    /// `<base>/buildpacks/<slug>`, with the slug kept as one path segment.
    fn buildpack_url(&self, slug: &str) -> Result<Url, ResolveError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ResolveError::InvalidRegistryUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(["buildpacks", slug]);
        Ok(url)
    }
}

impl RegistryLookup for HttpRegistry {
    fn lookup(&self, slug: &str) -> Result<String, ResolveError> {
        let url = self.buildpack_url(slug)?;
        tracing::debug!(%url, "looking up buildpack in registry");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| ResolveError::RegistryUnavailable {
                status: None,
                message: err.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(slug.to_string()));
        }
        if !status.is_success() {
            let message = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| response.text().unwrap_or_default());
            return Err(ResolveError::RegistryUnavailable {
                status: Some(status.as_u16()),
                message,
            });
        }

        response
            .json::<RegistryBuildpack>()
            .map(|body| body.blob_url)
            .map_err(|err| ResolveError::RegistryUnavailable {
                status: None,
                message: err.to_string(),
            })
    }
}
