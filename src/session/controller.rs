use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::acknowledgment::{AcknowledgmentSource, CyclicAcknowledgments};
use super::answer::{Answer, AnswerInput};
use super::catalog::{ClarifyingQuestion, QuestionCatalog};
use super::entry::{ConversationEntry, EntryLog, Speaker};
use super::error::{InvalidInput, SessionError};
use super::pacer::{Pacer, Timing, TokioPacer};
use super::phase::Phase;
use super::selection::{ContextReference, ContextSelection, Toggle};
use crate::roadmap::{GenerationRequest, QuestionAnswer, Roadmap};

/// Called with the finished roadmap once the generator reports completion
pub type CompletionCallback = Arc<dyn Fn(&Roadmap) + Send + Sync>;

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Every step of the turn was applied
    Completed,
    /// The session was reset while the turn was in flight; the rest was dropped
    Discarded,
}

/// One scheduled step of an agent turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStep {
    Pause(Duration),
    Say(String),
    EnterClarifying,
    AskQuestion(usize),
    EnterGenerating,
}

/// A planned agent turn, bound to the session generation that planned it.
///
/// The session stays busy while a turn is alive. Dropping an unfinished turn
/// applies its remaining steps at once so the session never stays stuck.
#[derive(Debug)]
pub struct Turn {
    session: Arc<Mutex<SessionInner>>,
    catalog: QuestionCatalog,
    generation: u64,
    steps: Vec<TurnStep>,
    cursor: usize,
    settled: bool,
}

impl Turn {
    /// Steps not yet played out
    pub fn steps(&self) -> &[TurnStep] {
        self.steps.get(self.cursor..).unwrap_or_default()
    }

    fn next_step(&mut self) -> Option<TurnStep> {
        let step = self.steps.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(step)
    }

    /// Apply a step if the session is still the one that planned it
    fn apply(&mut self, step: TurnStep) -> bool {
        let mut inner = self.session.lock();
        if inner.generation != self.generation {
            self.settled = true;
            return false;
        }
        inner.apply(step, &self.catalog);
        true
    }

    /// Lower the busy flag; `false` if the session was reset meanwhile
    fn finish(&mut self) -> bool {
        self.settled = true;
        let mut inner = self.session.lock();
        if inner.generation != self.generation {
            return false;
        }
        inner.thinking = false;
        true
    }
}

impl Drop for Turn {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.session.lock();
        if inner.generation != self.generation {
            return;
        }

        let remaining = self.steps.get(self.cursor..).unwrap_or_default();
        debug!(
            generation = self.generation,
            remaining = remaining.len(),
            "Turn dropped before finishing, applying the rest now"
        );
        for step in remaining {
            if !matches!(step, TurnStep::Pause(_)) {
                inner.apply(step.clone(), &self.catalog);
            }
        }
        inner.thinking = false;
    }
}

/// Conversation state of a single ideation session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    phase: Phase,
    question_index: usize,
    original_request: Option<String>,
    entries: EntryLog,
    answers: Vec<QuestionAnswer>,
    selected_context: ContextSelection,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the question being asked; only meaningful while clarifying
    pub fn pending_question_index(&self) -> Option<usize> {
        (self.phase == Phase::Clarifying).then_some(self.question_index)
    }

    pub fn original_request(&self) -> Option<&str> {
        self.original_request.as_deref()
    }

    pub fn entries(&self) -> &EntryLog {
        &self.entries
    }

    pub fn answers(&self) -> &[QuestionAnswer] {
        &self.answers
    }

    pub fn selected_context(&self) -> &ContextSelection {
        &self.selected_context
    }

    fn transition_to(&mut self, target: Phase) -> bool {
        if !self.phase.can_advance_to(target) {
            warn!(from = %self.phase, to = %target, "Refusing backward or skipping phase transition");
            return false;
        }
        debug!(from = %self.phase, to = %target, "Phase transition");
        self.phase = target;
        true
    }
}

/// Owned, render-ready copy of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub pending_question_index: Option<usize>,
    pub original_request: Option<String>,
    pub entries: Vec<ConversationEntry>,
    pub selected_context: Vec<ContextReference>,
    pub thinking: bool,
    pub current_question: Option<ClarifyingQuestion>,
}

impl SessionSnapshot {
    /// Options to offer as quick answers right now
    pub fn quick_options(&self) -> &[String] {
        match &self.current_question {
            Some(q) if !self.thinking => &q.options,
            _ => &[],
        }
    }

    /// Whether a presentation layer should accept typed input
    pub fn input_enabled(&self) -> bool {
        !self.thinking && self.phase.accepts_input()
    }
}

#[derive(Debug)]
struct SessionInner {
    session_id: Uuid,
    generation: u64,
    thinking: bool,
    state: SessionState,
}

impl SessionInner {
    fn fresh(generation: u64) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            generation,
            thinking: false,
            state: SessionState::default(),
        }
    }

    fn ensure_ready(&self, operation: &'static str, expected: Phase) -> Result<(), SessionError> {
        if self.state.phase != expected {
            debug!(operation, phase = %self.state.phase, "Rejected: illegal phase");
            return Err(SessionError::illegal_phase(operation, self.state.phase));
        }
        if self.thinking {
            debug!(operation, "Rejected: agent is thinking");
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn apply(&mut self, step: TurnStep, catalog: &QuestionCatalog) {
        match step {
            TurnStep::Pause(_) => {}
            TurnStep::Say(text) => {
                self.state.entries.push(Speaker::Agent, text);
            }
            TurnStep::EnterClarifying => {
                if self.state.transition_to(Phase::Clarifying) {
                    self.state.question_index = 0;
                }
            }
            TurnStep::AskQuestion(index) => match catalog.get(index) {
                Some(question) => {
                    self.state.question_index = index;
                    self.state.entries.push(Speaker::Agent, question.prompt.clone());
                    debug!(session = %self.session_id, index, "Asked clarifying question");
                }
                None => warn!(index, "Question index outside catalog"),
            },
            TurnStep::EnterGenerating => {
                if self.state.transition_to(Phase::Generating) {
                    self.state.question_index = catalog.len();
                    info!(session = %self.session_id, "Clarifying finished, ready to generate");
                }
            }
        }
    }

    fn current_question(&self, catalog: &QuestionCatalog) -> Option<ClarifyingQuestion> {
        self.state
            .pending_question_index()
            .and_then(|i| catalog.get(i))
            .cloned()
    }
}

/// Drives one ideation session through Collecting, Clarifying and Generating.
///
/// The controller is a cheap handle; clones share the same session. Each call
/// to [`SessionController::new`] creates an independent session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Mutex<SessionInner>>,
    catalog: QuestionCatalog,
    acknowledgments: Arc<dyn AcknowledgmentSource>,
    pacer: Arc<dyn Pacer>,
    timing: Timing,
    on_complete: Option<CompletionCallback>,
}

impl SessionController {
    /// Create a controller with the builtin acknowledgments and real delays
    pub fn new(catalog: QuestionCatalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner::fresh(0))),
            catalog,
            acknowledgments: Arc::new(CyclicAcknowledgments::default()),
            pacer: Arc::new(TokioPacer),
            timing: Timing::default(),
            on_complete: None,
        }
    }

    pub fn with_acknowledgments(mut self, source: Arc<dyn AcknowledgmentSource>) -> Self {
        self.acknowledgments = source;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Register the hand-off callback for finished roadmaps
    pub fn on_complete(mut self, callback: CompletionCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Submit the initial product request and run the agent's reply
    pub async fn submit_request(&self, text: &str) -> Result<TurnOutcome, SessionError> {
        let turn = self.begin_request(text)?;
        Ok(self.run_turn(turn).await)
    }

    /// Answer the pending clarifying question and run the agent's reply
    pub async fn answer_question(&self, input: AnswerInput) -> Result<TurnOutcome, SessionError> {
        let turn = self.begin_answer(input)?;
        Ok(self.run_turn(turn).await)
    }

    /// Validate and record the initial request, returning the agent turn to run.
    ///
    /// The session is busy until the returned turn has been run.
    pub fn begin_request(&self, text: &str) -> Result<Turn, SessionError> {
        let mut inner = self.inner.lock();
        inner.ensure_ready("submit a request", Phase::Collecting)?;

        let text = text.trim();
        if text.is_empty() {
            debug!("Rejected: empty request");
            return Err(InvalidInput::EmptyText.into());
        }

        inner.state.entries.push(Speaker::User, text);
        inner.state.original_request = Some(text.to_string());
        inner.thinking = true;
        info!(session = %inner.session_id, "Request submitted");

        let steps = vec![
            TurnStep::Pause(self.timing.opening_ack),
            TurnStep::Say(self.acknowledgments.opening()),
            TurnStep::Pause(self.timing.enter_clarifying),
            TurnStep::EnterClarifying,
            TurnStep::Pause(self.timing.ask_question),
            TurnStep::AskQuestion(0),
        ];
        Ok(self.plan(inner.generation, steps))
    }

    /// Validate and record an answer, returning the agent turn to run
    pub fn begin_answer(&self, input: AnswerInput) -> Result<Turn, SessionError> {
        let mut inner = self.inner.lock();
        inner.ensure_ready("answer a question", Phase::Clarifying)?;

        let index = inner.state.question_index;
        let Some(question) = self.catalog.get(index) else {
            return Err(SessionError::illegal_phase("answer a question", inner.state.phase));
        };

        let answer = input.resolve().ok_or(InvalidInput::MissingAnswer)?;
        if let Answer::Option(option) = &answer {
            if !question.offers(option) {
                debug!(option = %option, question = %question.id, "Rejected: unknown option");
                return Err(InvalidInput::UnknownOption.into());
            }
        }

        inner.state.entries.push(Speaker::User, answer.text());
        inner.state.answers.push(QuestionAnswer {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            answer: answer.clone(),
        });
        inner.thinking = true;
        debug!(session = %inner.session_id, index, "Answer recorded");

        let mut steps = vec![
            TurnStep::Pause(self.timing.answer_ack),
            TurnStep::Say(self.acknowledgments.acknowledge(index)),
            TurnStep::Pause(self.timing.next_question),
        ];
        let next = index + 1;
        if next < self.catalog.len() {
            steps.push(TurnStep::Pause(self.timing.ask_question));
            steps.push(TurnStep::AskQuestion(next));
        } else {
            steps.push(TurnStep::EnterGenerating);
            steps.push(TurnStep::Say(self.acknowledgments.ready()));
        }

        Ok(self.plan(inner.generation, steps))
    }

    fn plan(&self, generation: u64, steps: Vec<TurnStep>) -> Turn {
        Turn {
            session: Arc::clone(&self.inner),
            catalog: self.catalog.clone(),
            generation,
            steps,
            cursor: 0,
            settled: false,
        }
    }

    /// Play out a planned turn, dropping it if the session was reset meanwhile.
    ///
    /// If this future is cancelled, the turn finishes instantly on drop.
    pub async fn run_turn(&self, mut turn: Turn) -> TurnOutcome {
        while let Some(step) = turn.next_step() {
            if let TurnStep::Pause(duration) = step {
                self.pacer.pause(duration).await;
                continue;
            }
            if !turn.apply(step) {
                debug!(generation = turn.generation, "Discarding stale turn");
                return TurnOutcome::Discarded;
            }
        }

        if turn.finish() {
            TurnOutcome::Completed
        } else {
            debug!(generation = turn.generation, "Discarding stale turn");
            TurnOutcome::Discarded
        }
    }

    /// Add the reference to the selection, or remove it if already selected
    pub fn toggle_context_reference(
        &self,
        path: impl Into<ContextReference>,
    ) -> Result<Toggle, SessionError> {
        let reference = path.into();
        if reference.as_str().trim().is_empty() {
            return Err(InvalidInput::EmptyText.into());
        }

        let mut inner = self.inner.lock();
        let toggle = inner.state.selected_context.toggle(reference.clone());
        debug!(reference = %reference, ?toggle, "Context selection changed");
        Ok(toggle)
    }

    /// Throw the current session away and start a fresh one.
    ///
    /// Turns still in flight for the old session are discarded.
    pub fn reset(&self) -> Uuid {
        let mut inner = self.inner.lock();
        let generation = inner.generation + 1;
        *inner = SessionInner::fresh(generation);
        info!(session = %inner.session_id, generation, "Session reset");
        inner.session_id
    }

    /// What the roadmap generator should work on, once clarifying is over
    pub fn generation_request(&self) -> Option<GenerationRequest> {
        let inner = self.inner.lock();
        if inner.state.phase != Phase::Generating {
            return None;
        }
        Some(GenerationRequest {
            session_id: inner.session_id,
            original_request: inner.state.original_request.clone().unwrap_or_default(),
            selected_context: inner.state.selected_context.to_vec(),
            answers: inner.state.answers.clone(),
        })
    }

    /// Hand a finished roadmap to the registered callback.
    ///
    /// Returns `false` if the roadmap belongs to a session that is no longer
    /// live. Session state is never changed.
    pub fn on_generation_complete(&self, session_id: Uuid, roadmap: &Roadmap) -> bool {
        {
            let inner = self.inner.lock();
            if inner.session_id != session_id {
                debug!(stale = %session_id, live = %inner.session_id, "Discarding stale roadmap");
                return false;
            }
        }

        info!(session = %session_id, milestones = roadmap.milestones.len(), "Roadmap delivered");
        if let Some(callback) = &self.on_complete {
            callback(roadmap);
        }
        true
    }

    pub fn session_id(&self) -> Uuid {
        self.inner.lock().session_id
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().state.phase
    }

    pub fn is_thinking(&self) -> bool {
        self.inner.lock().thinking
    }

    pub fn pending_question_index(&self) -> Option<usize> {
        self.inner.lock().state.pending_question_index()
    }

    pub fn original_request(&self) -> Option<String> {
        self.inner.lock().state.original_request.clone()
    }

    pub fn entries(&self) -> Vec<ConversationEntry> {
        self.inner.lock().state.entries.as_slice().to_vec()
    }

    pub fn selected_context(&self) -> Vec<ContextReference> {
        self.inner.lock().state.selected_context.to_vec()
    }

    pub fn current_question(&self) -> Option<ClarifyingQuestion> {
        self.inner.lock().current_question(&self.catalog)
    }

    /// Copy of the whole session for rendering
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock();
        SessionSnapshot {
            session_id: inner.session_id,
            phase: inner.state.phase,
            pending_question_index: inner.state.pending_question_index(),
            original_request: inner.state.original_request.clone(),
            entries: inner.state.entries.as_slice().to_vec(),
            selected_context: inner.state.selected_context.to_vec(),
            thinking: inner.thinking,
            current_question: inner.current_question(&self.catalog),
        }
    }

    /// Clone of the full session state
    pub fn state(&self) -> SessionState {
        self.inner.lock().state.clone()
    }
}
