use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::parsing::{extract_ai_text, parse_solver_output, truncate_for_log, GeminiResponse};
use super::prompts::{build_fallback_prompt, solver_output_schema, FALLBACK_SYSTEM_INSTRUCTION};
use super::{build_http_client, status_error, GenerationRequest, SolverProvider, TextGenerator, GEMINI_PROVIDER_NAME};
use crate::error::ProviderError;
use crate::models::SolverOutput;

/// Thin client for Gemini `generateContent`.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(timeout)?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn request_body(request: &GenerationRequest) -> Value {
        let mut generation_config = Map::new();
        if let Some(temperature) = request.temperature {
            generation_config.insert("temperature".into(), json!(temperature));
        }
        if let Some(schema) = &request.response_schema {
            generation_config.insert("responseMimeType".into(), json!("application/json"));
            generation_config.insert("responseSchema".into(), schema.clone());
        }

        let mut body = json!({
            "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
            "generationConfig": generation_config,
        });
        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }
        body
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let ai_text = extract_ai_text(&gemini_response)?;
        debug!(model = %self.model, result = %truncate_for_log(ai_text, 60), "Gemini response");

        Ok(ai_text.to_string())
    }
}

/// Gemini as a structured solver, constrained to the `{ reasoning, answer }` schema.
pub struct GeminiSolver {
    client: Arc<GeminiClient>,
}

impl GeminiSolver {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SolverProvider for GeminiSolver {
    fn name(&self) -> &str {
        GEMINI_PROVIDER_NAME
    }

    async fn solve(&self, problem: &str) -> Result<SolverOutput, ProviderError> {
        let request = GenerationRequest::new(build_fallback_prompt(problem))
            .with_system(FALLBACK_SYSTEM_INSTRUCTION)
            .with_schema(solver_output_schema());

        let ai_text = self.client.generate(&request).await?;
        parse_solver_output(&ai_text)
    }
}
