use crate::models::Step;
use serde_json::{json, Value};

// ===== FALLBACK SOLVER =====

pub const FALLBACK_SYSTEM_INSTRUCTION: &str = "Solve the problem. In your 'reasoning' field, you MUST break the logic into steps \
using the format '### Step X: Title\\nDescription'. This is required for visualization.";

pub fn build_fallback_prompt(problem: &str) -> String {
    format!("Solve this problem: {}", problem)
}

/// Gemini response schema for `{ reasoning, answer }`.
pub fn solver_output_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "reasoning": { "type": "STRING" },
            "answer": { "type": "STRING" }
        },
        "required": ["reasoning", "answer"],
        "propertyOrdering": ["reasoning", "answer"]
    })
}

// ===== VIDEO QUERY =====

pub fn build_video_query_prompt(problem: &str) -> String {
    format!(
        "Given this coding problem: '{}', generate a concise YouTube search query to find the best \
         high-quality video tutorial (e.g., NeetCode or similar). Output ONLY the query string.",
        problem
    )
}

// ===== VISUAL NARRATION =====

pub const NARRATION_SYSTEM_INSTRUCTION: &str = "You are a tutor producing a VISUAL explanation. Do NOT change the algorithm. \
Describe the steps visually and conceptually. Return JSON matching the schema.";

/// Low temperature keeps repeated explanations of the same steps stable.
pub const NARRATION_TEMPERATURE: f32 = 0.3;

pub const FOCUS_POINT_COUNT: usize = 3;

pub fn build_narration_prompt(problem: &str, steps: &[Step]) -> String {
    let numbered = steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Problem:\n{}\n\nSteps:\n{}\n\nConstraints: Concise output, exactly {} focus_points.",
        problem, numbered, FOCUS_POINT_COUNT
    )
}

pub fn narration_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overview": {
                "type": "STRING",
                "description": "2-3 sentence overview of the solution in visual terms."
            },
            "diagram_caption": {
                "type": "STRING",
                "description": "One short caption explaining what the flowchart shows."
            },
            "focus_points": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": FOCUS_POINT_COUNT,
                "maxItems": FOCUS_POINT_COUNT,
                "description": "Exactly 3 bullet points of what to pay attention to."
            }
        },
        "required": ["overview", "diagram_caption", "focus_points"],
        "propertyOrdering": ["overview", "diagram_caption", "focus_points"]
    })
}
