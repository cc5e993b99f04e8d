use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Answer, ContextReference};

/// A clarifying question together with the user's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question_id: String,
    pub prompt: String,
    pub answer: Answer,
}

/// Everything the generator needs to plan a roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Session the plan is produced for; completion is checked against it
    pub session_id: Uuid,
    pub original_request: String,
    pub selected_context: Vec<ContextReference>,
    pub answers: Vec<QuestionAnswer>,
}

/// A generated implementation roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    pub session_id: Uuid,
    pub title: String,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl Milestone {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            details: Vec::new(),
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

impl Roadmap {
    /// Render as indented plain text
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        for (i, milestone) in self.milestones.iter().enumerate() {
            out.push_str(&format!("\n{}. {}\n", i + 1, milestone.title));
            for detail in &milestone.details {
                out.push_str(&format!("   - {}\n", detail));
            }
        }
        out
    }

    /// Render as a markdown document
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n", self.title);
        for milestone in &self.milestones {
            out.push_str(&format!("\n## {}\n\n", milestone.title));
            for detail in &milestone.details {
                out.push_str(&format!("- {}\n", detail));
            }
        }
        out
    }
}
