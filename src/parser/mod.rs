pub mod flowchart;
pub mod steps;

pub use flowchart::render_flowchart;
pub use steps::{extract_steps, DEFAULT_MAX_STEPS};
