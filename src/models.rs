use serde::{Deserialize, Serialize};
use std::fmt;

// ===== INBOUND REQUEST TYPES =====

#[derive(Debug, Clone, Deserialize)]
pub struct ProblemRequest {
    pub problem: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplainRequest {
    pub problem: String,
    pub reasoning: String,
    #[serde(default)]
    pub max_steps: Option<usize>,
}

// ===== SOLVER RESULTS =====

/// Output of a single solver provider. `answer` is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverOutput {
    pub reasoning: String,
    pub answer: String,
}

impl SolverOutput {
    /// A result only counts when the reasoning carries actual text.
    pub fn is_complete(&self) -> bool {
        !self.reasoning.trim().is_empty()
    }
}

/// Which branch produced the accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    Primary,
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Primary => "PRIMARY",
            Provenance::Fallback => "FALLBACK",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnswer {
    pub reasoning: String,
    pub answer: String,
    pub source: Provenance,
    pub video_url: Option<String>,
}

// ===== EXPLANATION TYPES =====

/// One block of a chain-of-reasoning, numbered as written in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub ordinal: u64,
    pub title: String,
    pub body: String,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {} - {}", self.ordinal, self.title, self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Narration {
    pub overview: String,
    pub diagram_caption: String,
    pub focus_points: Vec<String>,
}

// ===== OUTBOUND RESPONSE TYPES =====

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub status: &'static str,
    pub source: String,
    pub video_url: Option<String>,
    pub reasoning: String,
    pub answer: String,
}

impl From<ResolvedAnswer> for SolveResponse {
    fn from(resolved: ResolvedAnswer) -> Self {
        Self {
            status: "success",
            source: resolved.source.to_string(),
            video_url: resolved.video_url,
            reasoning: resolved.reasoning,
            answer: resolved.answer,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub status: &'static str,
    pub steps: Vec<Step>,
    pub flowchart: String,
    pub narration: Narration,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            status: "error",
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub primary: String,
    pub fallback_model: String,
    pub video_lookup: bool,
    pub started_at: String,
}
