/// Session management module - Gateway

mod acknowledgment;
mod answer;
mod catalog;
mod controller;
mod entry;
mod error;
mod pacer;
mod phase;
mod selection;

pub use acknowledgment::{AcknowledgmentSource, CyclicAcknowledgments};
pub use answer::{Answer, AnswerInput};
pub use catalog::{ClarifyingQuestion, QuestionCatalog};
pub use controller::{
    CompletionCallback, SessionController, SessionSnapshot, SessionState, Turn, TurnOutcome,
    TurnStep,
};
pub use entry::{ConversationEntry, EntryLog, Speaker};
pub use error::{InvalidInput, SessionError};
pub use pacer::{InstantPacer, Pacer, Timing, TokioPacer};
pub use phase::Phase;
pub use selection::{ContextReference, ContextSelection, Toggle};
