use std::io;
use thiserror::Error;

/// Custom result type alias for the crate
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors that can occur while fetching or analyzing a repository
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Repository or path does not exist on the remote host (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote throttling detected (HTTP 403/429). Also raised for
    /// unauthenticated requests that hit the lower rate-limit ceiling.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-success HTTP status, carrying the code
    #[error("Fetch failed with HTTP status {0}")]
    FetchFailed(u16),

    /// HTTP transport errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Base64 content that could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Repository identifier that could not be parsed
    #[error("Invalid repository identifier: {0}")]
    InvalidRepo(String),

    /// General message errors
    #[error("{0}")]
    Message(String),
}

impl AnalyzerError {
    /// Creates a new error with the specified message
    pub fn new(message: &str) -> Self {
        Self::Message(message.to_string())
    }

    /// Checks if this error is transient and retryable by the caller
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited(_) | Self::FetchFailed(_) | Self::Io(_)
        )
    }

    /// Checks if this error is fatal and should terminate processing
    pub fn is_fatal(&self) -> bool {
        !self.is_transient()
    }
}
