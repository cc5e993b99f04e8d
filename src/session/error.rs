use thiserror::Error;

use super::phase::Phase;

/// Why a piece of user input was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("text is empty")]
    EmptyText,

    #[error("selected option is not offered by the current question")]
    UnknownOption,

    #[error("neither an option nor an answer was given")]
    MissingAnswer,
}

/// Rejections produced by the session controller.
///
/// None of these change session state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("Cannot {operation} while {phase}")]
    IllegalPhase {
        operation: &'static str,
        phase: Phase,
    },

    #[error("Agent is still thinking")]
    Busy,
}

impl SessionError {
    pub fn illegal_phase(operation: &'static str, phase: Phase) -> Self {
        Self::IllegalPhase { operation, phase }
    }
}
