//! Remote model plumbing: the hosted Space (primary solver), Gemini
//! (fallback solver and general text generation) and YouTube search.

mod gemini;
pub mod parsing;
pub mod prompts;
mod space;
mod youtube;

pub use gemini::{GeminiClient, GeminiSolver};
pub use space::SpaceClient;
pub use youtube::YouTubeClient;

use crate::error::ProviderError;
use crate::models::SolverOutput;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

// ===== PROVIDER LABELS =====

pub const SPACE_PROVIDER_NAME: &str = "HF_Space_Model";
pub const GEMINI_PROVIDER_NAME: &str = "Gemini_Fallback";

// ===== SEAMS =====

/// Anything that can turn a problem statement into reasoning plus an answer.
#[async_trait]
pub trait SolverProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn solve(&self, problem: &str) -> Result<SolverOutput, ProviderError>;
}

/// Free-form or schema-constrained text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}

/// Video search returning at most one video id.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn top_video_id(&self, query: &str) -> Result<Option<String>, ProviderError>;
}

#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: Option<f32>,
    /// When set, the reply is forced to JSON matching this schema.
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Turn a non-success response into the matching error.
pub(crate) async fn status_error(response: reqwest::Response) -> ProviderError {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimited;
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ProviderError::Status {
        status: status.as_u16(),
        body: parsing::truncate_for_log(&body, 200),
    }
}
