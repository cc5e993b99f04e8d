// Gateway module for roadmap generation - follows the Train Station Pattern
// All external access must go through this gateway

mod generator;
mod types;

pub use generator::{RoadmapGenerator, TemplateRoadmapGenerator};
pub use types::{GenerationRequest, Milestone, QuestionAnswer, Roadmap};

#[cfg(test)]
pub use generator::MockRoadmapGenerator;
