//! Errors raised while acquiring showcase projects.

/// Errors that can occur during an acquisition run.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShowcaseError {
    /// The request never produced a response (connect, TLS, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success HTTP status.
    #[error("GitHub API error: {reason}")]
    Status { status: u16, reason: String },

    /// Success status but the GraphQL payload carried an `errors` list.
    #[error("{0}")]
    UpstreamReported(String),

    /// The payload did not have the expected container structure.
    #[error("{0}")]
    MalformedResponse(String),

    /// Configured endpoints could not be turned into a request.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShowcaseError {
    /// Build a `Status` error from a raw code, using the canonical reason phrase.
    pub fn status(status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        ShowcaseError::Status { status, reason }
    }
}

impl From<reqwest::Error> for ShowcaseError {
    fn from(e: reqwest::Error) -> Self {
        ShowcaseError::Transport(e.to_string())
    }
}

/// Convenience result type.
pub type ShowcaseResult<T> = Result<T, ShowcaseError>;
