use crate::models::Step;

/// Mermaid keyword for a top-down flowchart.
const FLOWCHART_HEADER: &str = "flowchart TD";

/// Render steps as a Mermaid top-down chain: one node per step, one edge
/// from each step to the next. No steps, no diagram.
pub fn render_flowchart(steps: &[Step]) -> String {
    if steps.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(steps.len() * 2);
    lines.push(FLOWCHART_HEADER.to_string());

    for (i, step) in steps.iter().enumerate() {
        let label = sanitize_label(&step.to_string());
        // ["` ... `"] is Mermaid's markdown-string label form
        lines.push(format!("    node{}[\"`{}`\"]", i, label.trim()));

        if i + 1 < steps.len() {
            lines.push(format!("    node{} --> node{}", i, i + 1));
        }
    }

    lines.join("\n")
}

/// Replace every character that can close or restructure a node label.
pub fn sanitize_label(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '"' | '`' => '\'',
            '\\' => '/',
            '<' => '‹',
            '>' => '›',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}
