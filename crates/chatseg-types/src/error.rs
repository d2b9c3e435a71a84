use thiserror::Error;

/// Errors raised while constructing, materializing or encoding segments.
///
/// None of these are caught inside the materializer, encoder or forward
/// aggregator; they surface to whoever asked for the conversion.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// Malformed input at construction (e.g. a non-http scheme passed to a
    /// URL-only constructor).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced local file does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Fetch or download failure. Never retried by this layer.
    #[error("network error: {0}")]
    Network(String),

    /// Publishing requested while no callback base URL is configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unsupported or inconsistent field combination during encode.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Staging area read/write failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl SegmentError {
    /// The error raised when publishing is attempted without a callback base.
    pub fn publishing_unavailable() -> Self {
        SegmentError::Configuration(
            "callback_api_base is not configured, publishing unavailable".to_string(),
        )
    }
}

impl From<serde_json::Error> for SegmentError {
    fn from(err: serde_json::Error) -> Self {
        SegmentError::Serialization(err.to_string())
    }
}
