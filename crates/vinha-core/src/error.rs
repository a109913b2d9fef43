use crate::model::ReportKind;

#[derive(Debug, thiserror::Error)]
pub enum VinhaError {
    #[error("invalid category '{category}' for {kind} report")]
    InvalidCategory { kind: ReportKind, category: String },

    #[error("{kind} report requires a category")]
    MissingCategory { kind: ReportKind },

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("data table not found in upstream page")]
    TableNotFound,

    #[error("malformed number '{0}'")]
    MalformedNumber(String),

    #[error("failed to parse report: {0}")]
    ParseError(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VinhaError {
    /// Whether the error comes from the caller's input rather than the upstream page.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            VinhaError::InvalidCategory { .. } | VinhaError::MissingCategory { .. }
        )
    }
}
