//! Turning user-supplied buildpack names into canonical URLs and back.

use crate::buildpack::list::Target;
use crate::error::ResolveError;
use crate::registry::RegistryLookup;
use reqwest::Url;
use std::net::IpAddr;

const REGISTRY_BLOB_PREFIX: &str = "https://buildpack-registry.s3.amazonaws.com/buildpacks/";
const LANGUAGE_PACK_PREFIX: &str = "https://codon-buildpacks.s3.amazonaws.com/buildpacks/heroku/";

pub struct Resolver<'a> {
    registry: &'a dyn RegistryLookup,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a dyn RegistryLookup) -> Self {
        Self { registry }
    }

    /// Canonical URL for `identifier`. URLs pass through without a lookup.
    pub fn resolve(&self, identifier: &str) -> Result<String, ResolveError> {
        if is_url(identifier) {
            return Ok(identifier.to_string());
        }

        // A malformed slug is only reported; the registry has the final say.
        if let Err(err) = validate_slug(identifier) {
            tracing::warn!("{err}");
        }

        self.registry.lookup(identifier)
    }

    pub fn target(&self, identifier: &str) -> Result<Target, ResolveError> {
        let url = self.resolve(identifier)?;
        Ok(Target::new(identifier, url))
    }
}

/// Whether `value` looks like an http(s) or ftp URL with a real host.
///
/// The scheme may be omitted (`example.com/pack.tgz`), in which case the
/// host must carry a top-level domain so that `namespace/name` slugs are
/// never mistaken for hosts.
pub fn is_url(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }

    let candidate = if value.contains("://") {
        value.to_string()
    } else {
        format!("http://{value}")
    };

    let Ok(url) = Url::parse(&candidate) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https" | "ftp") {
        return false;
    }

    match url.host_str() {
        Some(host) if host.starts_with('[') => true,
        Some(host) if host.parse::<IpAddr>().is_ok() => true,
        Some(host) => has_top_level_domain(host),
        None => false,
    }
}

fn has_top_level_domain(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return false;
    }
    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Check that `slug` has the `namespace/name` registry form.
pub fn validate_slug(slug: &str) -> Result<(), ResolveError> {
    let invalid = |reason: &str| ResolveError::InvalidSlug {
        slug: slug.to_string(),
        reason: reason.to_string(),
    };

    let (namespace, name) = slug
        .split_once('/')
        .ok_or_else(|| invalid("expected namespace/name"))?;

    if namespace.is_empty() {
        return Err(invalid("namespace is empty"));
    }
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if !is_slug_segment(namespace) {
        return Err(invalid("namespace may only contain letters, digits, '_' and '-'"));
    }
    if !is_slug_segment(name) {
        return Err(invalid("name may only contain letters, digits, '_' and '-'"));
    }
    Ok(())
}

fn is_slug_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Short `namespace/name` form of a known buildpack blob URL.
///
/// With `registry_only`, only registry blob URLs are shortened. Anything
/// unrecognised is returned as-is.
pub fn url_to_display_name(url: &str, registry_only: bool) -> String {
    if let Some(slug) = registry_slug(url) {
        return slug.to_string();
    }

    if !registry_only {
        if let Some(name) = language_pack_name(url) {
            return format!("heroku/{name}");
        }
    }

    url.to_string()
}

fn registry_slug(url: &str) -> Option<&str> {
    let slug = url
        .strip_prefix(REGISTRY_BLOB_PREFIX)?
        .strip_suffix(".tgz")?;
    validate_slug(slug).ok().map(|_| slug)
}

fn language_pack_name(url: &str) -> Option<&str> {
    let name = url
        .strip_prefix(LANGUAGE_PACK_PREFIX)?
        .strip_suffix(".tgz")?;
    is_slug_segment(name).then_some(name)
}
