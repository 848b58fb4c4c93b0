#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Service unavailable: {0}")]
    NotConfigured(String),

    #[error("API rate limit exceeded")]
    RateLimited,

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No {vocabulary} mapping for set '{set_id}'")]
    UnmappedSet { set_id: String, vocabulary: String },

    #[error("This card is already in your portfolio (existing card {existing_id})")]
    DuplicateCard { existing_id: String },

    #[error("Card not found in portfolio: {0}")]
    CardNotFound(String),

    #[error("Portfolio for '{user_id}' changed concurrently (expected version {expected})")]
    VersionConflict { user_id: String, expected: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TrackerError {
    /// Whether the failure is a transient upstream condition that callers
    /// recover from by serving cached data or an "unavailable" sentinel.
    pub fn is_transient(&self) -> bool {
        match self {
            TrackerError::Http(_) | TrackerError::RateLimited | TrackerError::Json(_) => true,
            TrackerError::UpstreamStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
