use std::sync::Arc;
use tracing::{info, warn};

use super::retry::{Exhausted, RetryPolicy};
use super::video::VideoLookup;
use crate::ai::parsing::truncate_for_log;
use crate::ai::SolverProvider;
use crate::error::{ProviderError, SolveError};
use crate::models::{Provenance, ResolvedAnswer, SolverOutput};

/// Terminal states of the primary/fallback resolution.
#[derive(Debug)]
pub enum Outcome {
    Success {
        output: SolverOutput,
        source: Provenance,
    },
    Exhausted(FailureDetail),
}

#[derive(Debug)]
pub struct FailureDetail {
    /// Why the primary result was not used.
    pub primary_error: String,
    pub fallback_attempts: u32,
    pub fallback_error: ProviderError,
}

pub struct Solver {
    primary: Arc<dyn SolverProvider>,
    fallback: Arc<dyn SolverProvider>,
    retry: RetryPolicy,
    videos: VideoLookup,
}

impl Solver {
    pub fn new(
        primary: Arc<dyn SolverProvider>,
        fallback: Arc<dyn SolverProvider>,
        retry: RetryPolicy,
        videos: VideoLookup,
    ) -> Self {
        Self {
            primary,
            fallback,
            retry,
            videos,
        }
    }

    pub fn videos(&self) -> &VideoLookup {
        &self.videos
    }

    /// Resolve the answer and look up a tutorial video concurrently.
    /// Only an exhausted fallback is an error; a missing video never is.
    pub async fn solve(&self, problem: &str) -> Result<ResolvedAnswer, SolveError> {
        let (outcome, video_url) = tokio::join!(self.resolve(problem), self.videos.find_tutorial(problem));

        match outcome {
            Outcome::Success { output, source } => Ok(ResolvedAnswer {
                reasoning: output.reasoning,
                answer: output.answer,
                source,
                video_url,
            }),
            Outcome::Exhausted(detail) => Err(SolveError::Exhausted {
                primary: detail.primary_error,
                attempts: detail.fallback_attempts,
                last: detail.fallback_error,
            }),
        }
    }

    pub async fn resolve(&self, problem: &str) -> Outcome {
        info!(
            provider = self.primary.name(),
            problem = %truncate_for_log(problem, 60),
            "Trying primary solver"
        );

        let primary_error = match self.try_primary(problem).await {
            Ok(output) => {
                info!(provider = self.primary.name(), "Primary solver succeeded");
                return Outcome::Success {
                    output,
                    source: Provenance::Primary,
                };
            }
            Err(e) => {
                warn!(provider = self.primary.name(), error = %e, "Primary solver failed, falling back");
                e.to_string()
            }
        };

        let fallback = self.fallback.as_ref();
        match self
            .retry
            .execute(fallback.name(), || fallback.solve(problem))
            .await
        {
            Ok(output) => {
                info!(provider = fallback.name(), "Fallback solver succeeded");
                Outcome::Success {
                    output,
                    source: Provenance::Fallback,
                }
            }
            Err(Exhausted { attempts, last }) => {
                warn!(provider = fallback.name(), attempts, error = %last, "Fallback solver exhausted");
                Outcome::Exhausted(FailureDetail {
                    primary_error,
                    fallback_attempts: attempts,
                    fallback_error: last,
                })
            }
        }
    }

    // Transport errors, undecodable output and blank reasoning all count as failure.
    async fn try_primary(&self, problem: &str) -> Result<SolverOutput, ProviderError> {
        let output = self.primary.solve(problem).await?;
        if output.is_complete() {
            Ok(output)
        } else {
            Err(ProviderError::Incomplete)
        }
    }
}
