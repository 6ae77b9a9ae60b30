use crate::error::ApiError;
use crate::platform::{
    App, BuildpackInstallation, BuildpackUpdate, BuildpackUpdates, ConfigVars, OciImage, Pipeline,
    PipelineCoupling, PlatformApi, Release, TestNode, TestRun,
};
use reqwest::{StatusCode, Url};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, RANGE, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_URL: &str = "https://api.heroku.com";

const ACCEPT_V3: &str = "application/vnd.heroku+json; version=3";
const ACCEPT_SDK: &str = "application/vnd.heroku+json; version=3.sdk";
const NEXT_RANGE: &str = "next-range";
const RELEASES_RANGE: &str = "version ..; max=10, order=desc";
const LATEST_TEST_RUN_RANGE: &str = "number ..; order=desc,max=1";

pub struct HttpPlatform {
    base: Url,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpPlatform {
    pub fn new(base: &str, api_key: &str) -> Result<Self, ApiError> {
        let base = base_url(base)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("bpctl"));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));
        let auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ApiError::InvalidApiKey)?;
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::Client(err.to_string()))?;

        Ok(Self { base, client })
    }

    /// `segments` appended to the base URL, each one percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => error.message,
            Err(_) if body.trim().is_empty() => {
                status.canonical_reason().unwrap_or("request failed").to_string()
            }
            Err(_) => body,
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        tracing::debug!(method = "GET", path = url.path(), "platform request");
        let response = self.send(self.client.get(url))?;
        parse(response)
    }

    /// First page only, with explicit range and schema headers.
    fn get_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        range: &str,
        accept: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.url(segments)?;
        tracing::debug!(method = "GET", path = url.path(), range, "platform request");
        let request = self
            .client
            .get(url)
            .header(RANGE, range)
            .header(ACCEPT, accept);
        parse(self.send(request)?)
    }

    /// Every page of a list, following `Next-Range` while the server
    /// answers `206 Partial Content`.
    fn get_all<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>, ApiError> {
        let url = self.url(segments)?;
        let mut items = Vec::new();
        let mut range: Option<String> = None;

        loop {
            tracing::debug!(method = "GET", path = url.path(), range = ?range, "platform request");
            let mut request = self.client.get(url.clone());
            if let Some(range) = &range {
                request = request.header(RANGE, range.as_str());
            }

            let response = self.send(request)?;
            let partial = response.status() == StatusCode::PARTIAL_CONTENT;
            let next = response
                .headers()
                .get(NEXT_RANGE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            let mut page: Vec<T> = parse(response)?;
            items.append(&mut page);

            match next {
                Some(next) if partial => range = Some(next),
                _ => break,
            }
        }

        Ok(items)
    }
}

/// Parse a configured base URL, refusing ones that cannot take path segments.
fn base_url(base: &str) -> Result<Url, ApiError> {
    let invalid = || ApiError::InvalidBaseUrl {
        url: base.to_string(),
    };
    let url = Url::parse(base).map_err(|_| invalid())?;
    if url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .map_err(|err| ApiError::Parse(err.to_string()))
}

impl PlatformApi for HttpPlatform {
    fn app(&self, app: &str) -> Result<App, ApiError> {
        self.get(&["apps", app])
    }

    fn buildpack_installations(&self, app: &str) -> Result<Vec<BuildpackInstallation>, ApiError> {
        self.get_all(&["apps", app, "buildpack-installations"])
    }

    fn replace_buildpack_installations(
        &self,
        app: &str,
        updates: &[BuildpackUpdate],
    ) -> Result<Vec<BuildpackInstallation>, ApiError> {
        let url = self.url(&["apps", app, "buildpack-installations"])?;
        tracing::debug!(method = "PUT", path = url.path(), count = updates.len(), "platform request");
        let request = self.client.put(url).json(&BuildpackUpdates { updates });
        parse(self.send(request)?)
    }

    fn latest_releases(&self, app: &str) -> Result<Vec<Release>, ApiError> {
        self.get_page(&["apps", app, "releases"], RELEASES_RANGE, ACCEPT_SDK)
    }

    fn oci_image(&self, app: &str, image_id: &str) -> Result<Vec<OciImage>, ApiError> {
        let url = self.url(&["apps", app, "oci-images", image_id])?;
        tracing::debug!(method = "GET", path = url.path(), "platform request");
        let request = self.client.get(url).header(ACCEPT, ACCEPT_SDK);
        parse(self.send(request)?)
    }

    fn config_vars(&self, app: &str) -> Result<ConfigVars, ApiError> {
        self.get(&["apps", app, "config-vars"])
    }

    fn pipeline(&self, pipeline: &str) -> Result<Pipeline, ApiError> {
        self.get(&["pipelines", pipeline])
    }

    fn pipeline_coupling(&self, app: &str) -> Result<PipelineCoupling, ApiError> {
        self.get(&["apps", app, "pipeline-couplings"])
    }

    fn latest_test_runs(&self, pipeline_id: &str) -> Result<Vec<TestRun>, ApiError> {
        self.get_page(
            &["pipelines", pipeline_id, "test-runs"],
            LATEST_TEST_RUN_RANGE,
            ACCEPT_V3,
        )
    }

    fn test_run(&self, pipeline_id: &str, number: u64) -> Result<TestRun, ApiError> {
        self.get(&["pipelines", pipeline_id, "test-runs", &number.to_string()])
    }

    fn test_nodes(&self, test_run_id: &str) -> Result<Vec<TestNode>, ApiError> {
        self.get_all(&["test-runs", test_run_id, "test-nodes"])
    }
}
