//! HTTP client for the Statuspage v2 JSON API.
//!
//! Every status page exposes the same three resources under
//! `https://<domain>/api/v2/`. Responses come back as raw
//! `serde_json::Value` so the snapshot cache can store and replay them
//! without caring about their shape; the driver deserializes into the
//! typed [`crate::status`] model afterwards.

use std::time::Duration;

use serde_json::Value;

use crate::error::Error;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// The three resources a status page serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    /// Overall indicator plus component list (`summary.json`)
    Summary,
    /// Recent incident history (`incidents.json`)
    Incidents,
    /// Overall indicator alone (`status.json`), fetched live on demand
    Status,
}

impl Resource {
    /// Wire name, without the `.json` suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Summary => "summary",
            Resource::Incidents => "incidents",
            Resource::Status => "status",
        }
    }
}

/// Thin wrapper around a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct StatusClient {
    http: reqwest::Client,
}

impl StatusClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { http }
    }

    /// Fetch one resource for one domain.
    ///
    /// Non-2xx responses become [`Error::Api`]; there are no retries.
    pub async fn fetch(&self, domain: &str, resource: Resource) -> Result<Value, Error> {
        let url = endpoint(domain, resource);
        tracing::debug!(%url, "fetching");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json().await?)
    }
}

impl Default for StatusClient {
    fn default() -> Self {
        Self::new()
    }
}

fn endpoint(domain: &str, resource: Resource) -> String {
    format!("https://{domain}/api/v2/{}.json", resource.as_str())
}
