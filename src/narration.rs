use std::sync::Arc;
use tracing::{debug, warn};

use crate::ai::parsing::{strip_code_fence, truncate_for_log};
use crate::ai::prompts::{
    build_narration_prompt, narration_schema, FOCUS_POINT_COUNT, NARRATION_SYSTEM_INSTRUCTION,
    NARRATION_TEMPERATURE,
};
use crate::ai::{GenerationRequest, TextGenerator};
use crate::error::NarrationError;
use crate::models::{Narration, Step};

/// Turns extracted steps into a short visual explanation.
pub struct NarrationGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl NarrationGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// One model call per non-empty step list. The reply must match the
    /// narration shape exactly; nothing is patched up.
    pub async fn generate_visual_narration(
        &self,
        problem: &str,
        steps: &[Step],
    ) -> Result<Narration, NarrationError> {
        if steps.is_empty() {
            return Ok(no_steps_narration());
        }

        let request = GenerationRequest::new(build_narration_prompt(problem, steps))
            .with_system(NARRATION_SYSTEM_INSTRUCTION)
            .with_temperature(NARRATION_TEMPERATURE)
            .with_schema(narration_schema());

        let ai_text = self.generator.generate(&request).await?;
        debug!(result = %truncate_for_log(&ai_text, 60), "Narration response");

        parse_narration(&ai_text).map_err(|e| {
            warn!(error = %e, "Narration rejected");
            e
        })
    }
}

pub fn parse_narration(ai_text: &str) -> Result<Narration, NarrationError> {
    let narration: Narration = serde_json::from_str(strip_code_fence(ai_text))
        .map_err(|e| NarrationError::SchemaViolation(e.to_string()))?;

    if narration.focus_points.len() != FOCUS_POINT_COUNT {
        return Err(NarrationError::SchemaViolation(format!(
            "expected {} focus_points, got {}",
            FOCUS_POINT_COUNT,
            narration.focus_points.len()
        )));
    }

    Ok(narration)
}

fn no_steps_narration() -> Narration {
    Narration {
        overview: "No step breakdown available for this solution.".to_string(),
        diagram_caption: "No step breakdown available.".to_string(),
        focus_points: vec![
            "The reasoning did not contain any 'Step N: Title' headings.".to_string(),
            "Read the raw reasoning for the full explanation.".to_string(),
            "The code answer is unaffected.".to_string(),
        ],
    }
}
