use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::ai::prompts::build_video_query_prompt;
use crate::ai::{GenerationRequest, TextGenerator, VideoSearch};
use crate::error::ProviderError;

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Generated query -> one YouTube result. Never fails: any problem means no video.
pub struct VideoLookup {
    generator: Arc<dyn TextGenerator>,
    search: Option<Arc<dyn VideoSearch>>,
}

impl VideoLookup {
    pub fn new(generator: Arc<dyn TextGenerator>, search: Option<Arc<dyn VideoSearch>>) -> Self {
        Self { generator, search }
    }

    pub fn is_enabled(&self) -> bool {
        self.search.is_some()
    }

    pub async fn find_tutorial(&self, problem: &str) -> Option<String> {
        let search = self.search.as_ref()?;

        match self.lookup(search.as_ref(), problem).await {
            Ok(Some(url)) => {
                info!(video_url = %url, "Tutorial video found");
                Some(url)
            }
            Ok(None) => {
                debug!("No tutorial video found");
                None
            }
            Err(e) => {
                warn!(error = %e, "Video lookup failed");
                None
            }
        }
    }

    async fn lookup(&self, search: &dyn VideoSearch, problem: &str) -> Result<Option<String>, ProviderError> {
        let request = GenerationRequest::new(build_video_query_prompt(problem));
        let raw_query = self.generator.generate(&request).await?;

        let query = clean_query(&raw_query);
        if query.is_empty() {
            return Ok(None);
        }
        debug!(query = %query, "Searching tutorial video");

        Ok(search.top_video_id(&query).await?.map(|id| watch_url(&id)))
    }
}

fn clean_query(raw: &str) -> String {
    raw.trim().replace('"', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedQuery(Result<&'static str, ()>);

    #[async_trait]
    impl TextGenerator for FixedQuery {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
            self.0
                .map(String::from)
                .map_err(|_| ProviderError::EmptyResponse("Gemini"))
        }
    }

    #[derive(Default)]
    struct RecordingSearch {
        result: Option<&'static str>,
        fail: bool,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl VideoSearch for RecordingSearch {
        async fn top_video_id(&self, query: &str) -> Result<Option<String>, ProviderError> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(ProviderError::Status { status: 403, body: "quota".into() });
            }
            Ok(self.result.map(String::from))
        }
    }

    #[tokio::test]
    async fn test_found_video_becomes_watch_url() {
        let search = Arc::new(RecordingSearch { result: Some("abc"), ..Default::default() });
        let lookup = VideoLookup::new(Arc::new(FixedQuery(Ok("  \"two sum neetcode\"\n"))), Some(search.clone()));

        assert_eq!(
            lookup.find_tutorial("Two Sum").await.as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );
        assert_eq!(*search.queries.lock().unwrap(), vec!["two sum neetcode".to_string()]);
    }

    #[tokio::test]
    async fn test_no_results_is_none() {
        let search = Arc::new(RecordingSearch::default());
        let lookup = VideoLookup::new(Arc::new(FixedQuery(Ok("q"))), Some(search));
        assert_eq!(lookup.find_tutorial("Two Sum").await, None);
    }

    #[tokio::test]
    async fn test_empty_query_skips_search() {
        let search = Arc::new(RecordingSearch { result: Some("abc"), ..Default::default() });
        let lookup = VideoLookup::new(Arc::new(FixedQuery(Ok(" \"\" "))), Some(search.clone()));

        assert_eq!(lookup.find_tutorial("Two Sum").await, None);
        assert!(search.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_absorbed() {
        let failing_search = Arc::new(RecordingSearch { fail: true, ..Default::default() });
        let lookup = VideoLookup::new(Arc::new(FixedQuery(Ok("q"))), Some(failing_search));
        assert_eq!(lookup.find_tutorial("Two Sum").await, None);

        let search = Arc::new(RecordingSearch { result: Some("abc"), ..Default::default() });
        let lookup = VideoLookup::new(Arc::new(FixedQuery(Err(()))), Some(search));
        assert_eq!(lookup.find_tutorial("Two Sum").await, None);
    }

    #[tokio::test]
    async fn test_disabled_without_search() {
        let lookup = VideoLookup::new(Arc::new(FixedQuery(Ok("q"))), None);
        assert!(!lookup.is_enabled());
        assert_eq!(lookup.find_tutorial("Two Sum").await, None);
    }
}
