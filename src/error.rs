use thiserror::Error;

/// Errors from any remote model, Space or search call.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} returned empty response")]
    EmptyResponse(&'static str),

    #[error("Malformed output: {0}")]
    Malformed(String),

    #[error("Output has no reasoning")]
    Incomplete,
}

impl ProviderError {
    /// Whether another attempt at the same call could reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(_) | ProviderError::RateLimited => true,
            ProviderError::Status { status, .. } => *status >= 500 || *status == 408,
            ProviderError::EmptyResponse(_)
            | ProviderError::Malformed(_)
            | ProviderError::Json(_)
            | ProviderError::Incomplete => true,
        }
    }
}

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("Primary solver failed ({primary}); fallback failed after {attempts} attempt(s): {last}")]
    Exhausted {
        primary: String,
        attempts: u32,
        last: ProviderError,
    },
}

#[derive(Error, Debug)]
pub enum NarrationError {
    #[error("Narration request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Narration does not match schema: {0}")]
    SchemaViolation(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in .env")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}
