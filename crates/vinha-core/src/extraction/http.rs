use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::VinhaError;
use crate::extraction::ReportSource;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream backend that GETs pages from the Vitibrasil site.
///
/// Every call goes to the network; nothing is cached.
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, VinhaError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vinha/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpSource {
            client,
            base_url: base_url.into(),
        })
    }
}

impl ReportSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String, VinhaError> {
        debug!(url, "fetching upstream page");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| VinhaError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VinhaError::UpstreamUnavailable(format!(
                "{url} returned {status}"
            )));
        }

        response
            .text()
            .map_err(|e| VinhaError::UpstreamUnavailable(format!("reading body of {url}: {e}")))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
