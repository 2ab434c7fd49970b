use async_trait::async_trait;
use std::time::Duration;

use super::parsing::SearchListResponse;
use super::{build_http_client, status_error, VideoSearch};
use crate::error::ProviderError;

/// YouTube Data API v3 `search.list`, one video per query.
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(timeout)?,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn top_video_id(&self, query: &str) -> Result<Option<String>, ProviderError> {
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("part", "id,snippet"),
                ("maxResults", "1"),
                ("type", "video"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let listing: SearchListResponse = response.json().await?;
        Ok(listing
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id.video_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> YouTubeClient {
        YouTubeClient::new("yt-key", server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_first_video_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "two sum neetcode"))
            .and(query_param("maxResults", "1"))
            .and(query_param("type", "video"))
            .and(query_param("key", "yt-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": {"kind": "youtube#video", "videoId": "KLlXCFG5TnA"}}]
            })))
            .mount(&server)
            .await;

        let id = client_for(&server).top_video_id("two sum neetcode").await.unwrap();
        assert_eq!(id.as_deref(), Some("KLlXCFG5TnA"));
    }

    #[tokio::test]
    async fn test_no_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).top_video_id("q").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_quota_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
            .mount(&server)
            .await;

        assert!(client_for(&server).top_video_id("q").await.is_err());
    }
}
