pub mod fetch;
pub mod parse;
pub mod serve;

use clap::Args;
use std::time::Duration;
use vinha_core::catalog::DEFAULT_UPSTREAM_URL;
use vinha_core::error::VinhaError;
use vinha_core::extraction::http::HttpSource;

/// Where and how to reach the Vitibrasil site.
#[derive(Args, Debug, Clone)]
pub struct UpstreamArgs {
    /// Base URL of the report pages
    #[arg(long, env = "VINHA_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "VINHA_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl UpstreamArgs {
    pub fn source(&self) -> Result<HttpSource, VinhaError> {
        HttpSource::new(
            self.upstream_url.clone(),
            Duration::from_secs(self.timeout_secs),
        )
    }
}
