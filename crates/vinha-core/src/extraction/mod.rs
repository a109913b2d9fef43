pub mod http;
pub mod table;

use crate::error::VinhaError;

/// Trait for upstream page backends.
pub trait ReportSource: Send + Sync {
    /// Fetch the HTML document at `url`. One attempt, no retries.
    fn fetch(&self, url: &str) -> Result<String, VinhaError>;

    /// Root URL that report queries are appended to.
    fn base_url(&self) -> &str;
}
