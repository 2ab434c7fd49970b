use crate::error::ProviderError;
use crate::models::SolverOutput;
use serde::Deserialize;
use serde_json::Value;

// ===== API RESPONSE STRUCTURES =====

// Gemini response structure
#[derive(Debug, Deserialize)]
pub(super) struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

// Gradio "/call" handshake
#[derive(Debug, Deserialize)]
pub(super) struct EventHandle {
    pub event_id: String,
}

// YouTube search.list
#[derive(Debug, Deserialize)]
pub(super) struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

// ===== RESPONSE EXTRACTORS =====

/// Extract AI text from Gemini response structure
pub(super) fn extract_ai_text(gemini_response: &GeminiResponse) -> Result<&str, ProviderError> {
    gemini_response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.first())
        .and_then(|part| part.text.as_deref())
        .filter(|text| !text.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse("Gemini"))
}

/// Pull the payload of the `complete` event out of a Gradio SSE stream.
pub(super) fn parse_event_stream(body: &str) -> Result<Value, ProviderError> {
    let mut event = "";
    for line in body.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
        } else if let Some(data) = line.strip_prefix("data:") {
            match event {
                "complete" => return Ok(serde_json::from_str(data.trim())?),
                "error" => {
                    return Err(ProviderError::Malformed(format!(
                        "Space reported error: {}",
                        truncate_for_log(data.trim(), 120)
                    )))
                }
                _ => {}
            }
        }
    }
    Err(ProviderError::EmptyResponse("Space"))
}

// ===== PARSERS =====

/// Strip surrounding Markdown code fences from a model reply.
pub fn strip_code_fence(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Decode a JSON reply (possibly fenced) into a `SolverOutput`.
pub fn parse_solver_output(ai_text: &str) -> Result<SolverOutput, ProviderError> {
    let cleaned = strip_code_fence(ai_text);
    if !is_valid_json_object(cleaned) {
        return Err(ProviderError::Malformed(format!(
            "not a JSON object: {}",
            truncate_for_log(cleaned, 60)
        )));
    }
    Ok(serde_json::from_str(cleaned)?)
}

/// A Space prediction is either the JSON text of the output or the object itself.
pub fn decode_prediction(prediction: Value) -> Result<SolverOutput, ProviderError> {
    match prediction {
        Value::String(text) => parse_solver_output(&text),
        Value::Object(_) => Ok(serde_json::from_value(prediction)?),
        other => Err(ProviderError::Malformed(format!(
            "unexpected prediction type: {}",
            truncate_for_log(&other.to_string(), 60)
        ))),
    }
}

// ===== HELPERS =====

/// Check if string looks like a valid JSON object
pub(super) fn is_valid_json_object(s: &str) -> bool {
    s.starts_with('{') && s.ends_with('}')
}

/// Truncate text for logging
pub fn truncate_for_log(text: &str, max_len: usize) -> String {
    let clean_text = text.replace('\n', " ");
    if clean_text.chars().count() <= max_len {
        clean_text
    } else {
        let cut: String = clean_text.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}
