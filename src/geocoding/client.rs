//! HTTP client wrapper for the adresse API.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api-adresse.data.gouv.fr";

const USER_AGENT: &str = "netcover/0.1 (network coverage lookup)";

/// Adresse API client with connection configuration
#[derive(Clone)]
pub struct AdresseClient {
    client: Client,
    base_url: String,
}

impl AdresseClient {
    /// Create a new client.
    ///
    /// Requests have no timeout unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let url = Url::parse(base_url).with_context(|| format!("Invalid API URL '{}'", base_url))?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub(super) fn client(&self) -> &Client {
        &self.client
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
