use thiserror::Error;

use crate::session::SessionError;

/// Main error type for Dossier
#[derive(Error, Debug)]
pub enum DossierError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Context catalog error: {0}")]
    ContextError(String),

    #[error("Roadmap generation error: {0}")]
    GenerationError(String),
}
