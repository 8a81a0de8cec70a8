//! HTTP client for the dashboard service REST API.
//!
//! Endpoints used, relative to an environment's base URL:
//!
//! | Call | Path |
//! |---|---|
//! | connection check | `GET /api/v1/dashboards` |
//! | dashboard | `GET /api/v1/dashboards/{id}` |
//! | widgets | `GET /api/v1/dashboards/{id}/widgets` |
//! | export | `GET /api/v1/dashboards/{id}/export` |
//!
//! Requests carry `Authorization: Bearer {token}` when the environment has
//! a token. A 404 answers `None`; other non-success statuses are errors.

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use super::{widgets_from_response, DashboardSource};
use crate::config::{Environment, RetryConfig};
use crate::core::{Error, Result};

/// URL builder for one environment.
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    base: Url,
}

impl ServiceEndpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::Configuration(format!("invalid base_url '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "invalid base_url '{base_url}': not a hierarchical URL"
            )));
        }
        Ok(Self { base })
    }

    fn api(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["api", "v1", "dashboards"])
                .extend(segments);
        }
        url
    }

    pub fn dashboards(&self) -> Url {
        self.api(&[])
    }

    pub fn dashboard(&self, id: &str) -> Url {
        self.api(&[id])
    }

    pub fn widgets(&self, id: &str) -> Url {
        self.api(&[id, "widgets"])
    }

    pub fn export(&self, id: &str) -> Url {
        self.api(&[id, "export"])
    }
}

/// Dashboard source backed by one environment of the dashboard service.
///
/// Calls are blocking from the caller's point of view; each one drives a
/// private single-threaded runtime.
pub struct HttpSource {
    environment: Environment,
    endpoints: ServiceEndpoints,
    client: Client,
    retry: RetryConfig,
    runtime: tokio::runtime::Runtime,
}

impl HttpSource {
    pub fn new(environment: Environment, retry: RetryConfig) -> Result<Self> {
        let endpoints = ServiceEndpoints::new(&environment.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &environment.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                Error::Configuration(format!(
                    "token for environment '{}' is not a valid header value",
                    environment.name
                ))
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(retry.request_timeout())
            .user_agent(concat!("dashcompare/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            environment,
            endpoints,
            client,
            retry,
            runtime,
        })
    }

    /// Verify the environment answers the dashboard listing with the configured credentials.
    pub fn check_connection(&self) -> Result<()> {
        match self.get_json(self.endpoints.dashboards())? {
            Some(_) => Ok(()),
            None => Err(Error::Server {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: format!(
                    "{} does not expose the dashboards API",
                    self.environment.base_url
                ),
            }),
        }
    }

    fn get_json(&self, url: Url) -> Result<Option<Value>> {
        self.runtime.block_on(self.get_json_with_retry(url))
    }

    async fn get_json_with_retry(&self, url: Url) -> Result<Option<Value>> {
        let mut retries = 0;
        loop {
            match self.get_json_once(url.clone()).await {
                Err(e) if e.is_transient() && self.retry.should_retry(retries) => {
                    retries += 1;
                    let delay = self.retry.delay_for_attempt(retries);
                    log::warn!(
                        "GET {url} failed ({e}); retry {retries}/{} in {delay:?}",
                        self.retry.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn get_json_once(&self, url: Url) -> Result<Option<Value>> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Server {
                status: status.as_u16(),
                message: truncate_body(&message),
            });
        }

        Ok(Some(response.json::<Value>().await?))
    }
}

impl DashboardSource for HttpSource {
    fn environment(&self) -> &str {
        &self.environment.name
    }

    fn fetch_dashboard(&self, id: &str) -> Result<Option<Value>> {
        self.get_json(self.endpoints.dashboard(id))
    }

    fn fetch_widgets(&self, id: &str) -> Result<Vec<Value>> {
        Ok(self
            .get_json(self.endpoints.widgets(id))?
            .map(widgets_from_response)
            .unwrap_or_default())
    }

    fn fetch_export(&self, id: &str) -> Result<Option<Value>> {
        self.get_json(self.endpoints.export(id))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
