use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::parsing::{decode_prediction, parse_event_stream, EventHandle};
use super::{build_http_client, status_error, SolverProvider, SPACE_PROVIDER_NAME};
use crate::error::ProviderError;
use crate::models::SolverOutput;

/// Client for a model hosted on a Gradio Space, reached over the `/call` API.
pub struct SpaceClient {
    http: reqwest::Client,
    base_url: String,
    api_name: String,
    token: Option<String>,
}

impl SpaceClient {
    pub fn new(
        base_url: impl Into<String>,
        api_name: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_name: api_name.into(),
            token,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Run one prediction and return the raw first output value.
    pub async fn predict(&self, input: &str) -> Result<Value, ProviderError> {
        let call_url = format!("{}/call/{}", self.base_url, self.api_name);

        let response = self
            .authorize(self.http.post(&call_url))
            .json(&json!({ "data": [input] }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let handle: EventHandle = response.json().await?;
        debug!(event_id = %handle.event_id, "Space prediction queued");

        let response = self
            .authorize(self.http.get(format!("{}/{}", call_url, handle.event_id)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let stream = response.text().await?;

        match parse_event_stream(&stream)? {
            Value::Array(mut outputs) if !outputs.is_empty() => Ok(outputs.swap_remove(0)),
            _ => Err(ProviderError::EmptyResponse("Space")),
        }
    }
}

#[async_trait]
impl SolverProvider for SpaceClient {
    fn name(&self) -> &str {
        SPACE_PROVIDER_NAME
    }

    async fn solve(&self, problem: &str) -> Result<SolverOutput, ProviderError> {
        let prediction = self.predict(problem).await?;
        decode_prediction(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_call(server: &MockServer, stream: &str) {
        Mock::given(method("POST"))
            .and(path("/call/predict"))
            .and(body_json(json!({"data": ["Two Sum"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"event_id": "abc123"})))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/call/predict/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(stream))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer, token: Option<&str>) -> SpaceClient {
        SpaceClient::new(server.uri(), "predict", token.map(String::from), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_prediction_json_string_is_decoded() {
        let server = MockServer::start().await;
        let output = json!({"reasoning": "### Step 1: Map\nStore.", "answer": "code"}).to_string();
        let stream = format!("event: complete\ndata: {}\n\n", json!([output]));
        mount_call(&server, &stream).await;

        let result = client_for(&server, None).solve("Two Sum").await.unwrap();
        assert_eq!(result.answer, "code");
        assert!(result.is_complete());
    }

    #[tokio::test]
    async fn test_prediction_object_is_accepted() {
        let server = MockServer::start().await;
        let stream = "event: complete\ndata: [{\"reasoning\": \"\", \"answer\": \"x\"}]\n";
        mount_call(&server, stream).await;

        let result = client_for(&server, None).solve("Two Sum").await.unwrap();
        assert_eq!(result.answer, "x");
        assert!(!result.is_complete());
    }

    #[tokio::test]
    async fn test_prose_prediction_is_malformed() {
        let server = MockServer::start().await;
        mount_call(&server, "event: complete\ndata: [\"Sorry, I cannot help.\"]\n").await;

        let result = client_for(&server, None).solve("Two Sum").await;
        assert!(matches!(result, Err(ProviderError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_token_is_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call/predict"))
            .and(header("authorization", "Bearer hf_secret"))
            .respond_with(ResponseTemplate::new(503).set_body_string("sleeping"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server, Some("hf_secret")).predict("Two Sum").await;
        assert!(matches!(result, Err(ProviderError::Status { status: 503, .. })));
    }
}
