use std::sync::Arc;
use tracing::{info, warn};

use crate::roadmap::{Roadmap, RoadmapGenerator};
use crate::session::{AnswerInput, Phase, SessionController, TurnOutcome};
use crate::utils::DossierError;

/// What the host observed after forwarding a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The agent replied and the session waits for more input
    TurnCompleted,
    /// The session was reset while the agent was replying
    TurnDiscarded,
    /// Clarifying finished and the generator produced a plan
    RoadmapReady(Roadmap),
    /// A plan arrived for a session that is no longer live
    RoadmapDiscarded,
}

/// Hosts a session controller and hands finished sessions to a roadmap generator
#[derive(Clone)]
pub struct IdeationHost {
    controller: SessionController,
    generator: Arc<dyn RoadmapGenerator>,
}

impl IdeationHost {
    pub fn new(controller: SessionController, generator: Arc<dyn RoadmapGenerator>) -> Self {
        Self {
            controller,
            generator,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Forward the initial request
    pub async fn submit(&self, text: &str) -> Result<HostEvent, DossierError> {
        let outcome = self.controller.submit_request(text).await?;
        self.after_turn(outcome).await
    }

    /// Forward an answer; runs the generator when it was the last one
    pub async fn answer(&self, input: AnswerInput) -> Result<HostEvent, DossierError> {
        let outcome = self.controller.answer_question(input).await?;
        self.after_turn(outcome).await
    }

    async fn after_turn(&self, outcome: TurnOutcome) -> Result<HostEvent, DossierError> {
        match outcome {
            TurnOutcome::Discarded => Ok(HostEvent::TurnDiscarded),
            TurnOutcome::Completed if self.controller.phase() == Phase::Generating => {
                self.generate().await
            }
            TurnOutcome::Completed => Ok(HostEvent::TurnCompleted),
        }
    }

    /// Run the generator for the current session and deliver the result
    pub async fn generate(&self) -> Result<HostEvent, DossierError> {
        let Some(request) = self.controller.generation_request() else {
            return Err(DossierError::GenerationError(format!(
                "session is {}, not ready to generate",
                self.controller.phase()
            )));
        };

        info!(
            session = %request.session_id,
            context_files = request.selected_context.len(),
            "Starting roadmap generation"
        );
        let roadmap = self.generator.generate(&request).await.map_err(|e| {
            warn!(session = %request.session_id, error = %e, "Roadmap generation failed");
            DossierError::GenerationError(e.to_string())
        })?;

        if self
            .controller
            .on_generation_complete(request.session_id, &roadmap)
        {
            Ok(HostEvent::RoadmapReady(roadmap))
        } else {
            Ok(HostEvent::RoadmapDiscarded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::{GenerationRequest, Milestone, MockRoadmapGenerator};
    use crate::session::{InstantPacer, QuestionCatalog, SessionError, Timing};
    use parking_lot::Mutex;

    fn controller() -> SessionController {
        SessionController::new(QuestionCatalog::builtin())
            .with_pacer(Arc::new(InstantPacer))
            .with_timing(Timing::instant())
    }

    fn roadmap_for(request: &GenerationRequest) -> Roadmap {
        Roadmap {
            session_id: request.session_id,
            title: request.original_request.clone(),
            milestones: vec![Milestone::new("Build it")],
        }
    }

    async fn answer_all(host: &IdeationHost) -> HostEvent {
        let mut last = HostEvent::TurnCompleted;
        for _ in 0..host.controller().catalog().len() {
            last = host.answer(AnswerInput::typed("x")).await.unwrap();
        }
        last
    }

    #[tokio::test]
    async fn test_generator_runs_after_last_answer() {
        let mut generator = MockRoadmapGenerator::new();
        generator
            .expect_generate()
            .withf(|req: &GenerationRequest| req.original_request == "build a CRM")
            .times(1)
            .returning(|req| Ok(roadmap_for(req)));

        let delivered = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&delivered);
        let controller = controller().on_complete(Arc::new(move |roadmap: &Roadmap| {
            *sink.lock() = Some(roadmap.title.clone());
        }));
        let host = IdeationHost::new(controller, Arc::new(generator));

        assert_eq!(host.submit("build a CRM").await.unwrap(), HostEvent::TurnCompleted);
        let event = answer_all(&host).await;

        match event {
            HostEvent::RoadmapReady(roadmap) => assert_eq!(roadmap.title, "build a CRM"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(delivered.lock().as_deref(), Some("build a CRM"));
        assert_eq!(host.controller().phase(), Phase::Generating);
    }

    #[tokio::test]
    async fn test_generator_receives_selected_context() {
        let mut generator = MockRoadmapGenerator::new();
        generator
            .expect_generate()
            .withf(|req: &GenerationRequest| {
                req.selected_context.len() == 1 && req.selected_context[0].as_str() == "src/lib/db.ts"
            })
            .times(1)
            .returning(|req| Ok(roadmap_for(req)));
        let host = IdeationHost::new(controller(), Arc::new(generator));

        host.controller().toggle_context_reference("src/lib/db.ts").unwrap();
        host.submit("invoicing").await.unwrap();

        assert!(matches!(answer_all(&host).await, HostEvent::RoadmapReady(_)));
    }

    #[tokio::test]
    async fn test_generator_failure_keeps_generating_phase() {
        let mut generator = MockRoadmapGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("planner offline")));
        let host = IdeationHost::new(controller(), Arc::new(generator));

        host.submit("idea").await.unwrap();
        host.answer(AnswerInput::typed("a")).await.unwrap();
        host.answer(AnswerInput::typed("b")).await.unwrap();
        let err = host.answer(AnswerInput::typed("c")).await.unwrap_err();

        assert!(matches!(err, DossierError::GenerationError(_)));
        assert_eq!(host.controller().phase(), Phase::Generating);
    }

    #[tokio::test]
    async fn test_generate_before_clarifying_is_done() {
        let mut generator = MockRoadmapGenerator::new();
        generator.expect_generate().never();
        let host = IdeationHost::new(controller(), Arc::new(generator));

        assert!(matches!(
            host.generate().await,
            Err(DossierError::GenerationError(_))
        ));
    }

    #[tokio::test]
    async fn test_session_errors_pass_through() {
        let mut generator = MockRoadmapGenerator::new();
        generator.expect_generate().never();
        let host = IdeationHost::new(controller(), Arc::new(generator));

        let err = host.answer(AnswerInput::typed("too early")).await.unwrap_err();
        assert!(matches!(
            err,
            DossierError::Session(SessionError::IllegalPhase { .. })
        ));
    }

    #[tokio::test]
    async fn test_roadmap_for_reset_session_is_discarded() {
        let mut generator = MockRoadmapGenerator::new();
        let host_controller = controller();
        let resetter = host_controller.clone();
        generator.expect_generate().times(1).returning(move |req| {
            // The user starts over while the plan is being produced
            resetter.reset();
            Ok(roadmap_for(req))
        });
        let host = IdeationHost::new(host_controller, Arc::new(generator));

        host.submit("idea").await.unwrap();
        assert_eq!(answer_all(&host).await, HostEvent::RoadmapDiscarded);
        assert_eq!(host.controller().phase(), Phase::Collecting);
    }
}
