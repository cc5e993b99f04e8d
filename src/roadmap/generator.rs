use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::types::{GenerationRequest, Milestone, Roadmap};
use crate::session::{Pacer, TokioPacer};

/// Core trait for anything that turns a clarified request into a roadmap
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoadmapGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Roadmap>;
}

/// Builds a deterministic roadmap from the request and answers.
///
/// Stands in for a real planning agent; it waits out a simulated
/// generation period before answering.
pub struct TemplateRoadmapGenerator {
    pacer: Arc<dyn Pacer>,
    delay: Duration,
}

impl TemplateRoadmapGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            pacer: Arc::new(TokioPacer),
            delay,
        }
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    fn build(request: &GenerationRequest) -> Roadmap {
        let mut milestones = Vec::new();

        milestones.push(
            Milestone::new("Discovery")
                .detail(format!("Confirm scope: {}", request.original_request))
                .detail("Write acceptance criteria for the core workflow"),
        );

        for qa in &request.answers {
            milestones.push(
                Milestone::new(qa.prompt.trim_end_matches('?').to_string())
                    .detail(format!("Design around: {}", qa.answer.text())),
            );
        }

        if !request.selected_context.is_empty() {
            let mut integration = Milestone::new("Integrate with existing code");
            for reference in &request.selected_context {
                integration = integration.detail(format!("Review {}", reference));
            }
            milestones.push(integration);
        }

        milestones.push(
            Milestone::new("Delivery")
                .detail("Ship behind a feature flag")
                .detail("Collect feedback from the first users"),
        );

        Roadmap {
            session_id: request.session_id,
            title: format!("Implementation roadmap: {}", request.original_request),
            milestones,
        }
    }
}

#[async_trait]
impl RoadmapGenerator for TemplateRoadmapGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Roadmap> {
        debug!(session = %request.session_id, "Generating roadmap");
        self.pacer.pause(self.delay).await;
        Ok(Self::build(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::QuestionAnswer;
    use crate::session::{Answer, ContextReference, InstantPacer};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn request(context: Vec<ContextReference>) -> GenerationRequest {
        GenerationRequest {
            session_id: Uuid::new_v4(),
            original_request: "a CRM for plumbers".to_string(),
            selected_context: context,
            answers: vec![QuestionAnswer {
                question_id: "q1".to_string(),
                prompt: "Who are the primary users of this product?".to_string(),
                answer: Answer::Option("Field workers".to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn test_roadmap_follows_answers() {
        let generator =
            TemplateRoadmapGenerator::new(Duration::from_secs(5)).with_pacer(Arc::new(InstantPacer));
        let request = request(Vec::new());

        let roadmap = generator.generate(&request).await.unwrap();

        assert_eq!(roadmap.session_id, request.session_id);
        let titles: Vec<&str> = roadmap.milestones.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Discovery",
                "Who are the primary users of this product",
                "Delivery"
            ]
        );
        assert_eq!(roadmap.milestones[1].details, vec!["Design around: Field workers"]);
    }

    #[tokio::test]
    async fn test_context_adds_integration_milestone() {
        let generator =
            TemplateRoadmapGenerator::new(Duration::ZERO).with_pacer(Arc::new(InstantPacer));
        let request = request(vec![
            ContextReference::new("src/api/customers.ts"),
            ContextReference::new("prisma/schema.prisma"),
        ]);

        let roadmap = generator.generate(&request).await.unwrap();
        let integration = roadmap
            .milestones
            .iter()
            .find(|m| m.title == "Integrate with existing code")
            .unwrap();

        assert_eq!(
            integration.details,
            vec!["Review src/api/customers.ts", "Review prisma/schema.prisma"]
        );
    }
}
