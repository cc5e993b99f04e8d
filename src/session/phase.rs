use serde::{Deserialize, Serialize};
use std::fmt;

/// The stage an ideation session is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the user to describe what they want to build
    Collecting,
    /// Walking through the clarifying question catalog
    Clarifying,
    /// Handed off to the roadmap generator
    Generating,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Collecting
    }
}

impl Phase {
    /// The phase that follows this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Collecting => Some(Self::Clarifying),
            Self::Clarifying => Some(Self::Generating),
            Self::Generating => None,
        }
    }

    /// Phases only ever move one step forward
    pub fn can_advance_to(&self, target: Phase) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Generating)
    }

    /// Whether the user is expected to type something in this phase
    pub fn accepts_input(&self) -> bool {
        !self.is_terminal()
    }

    /// Input placeholder shown by a presentation layer
    pub fn input_hint(&self) -> &str {
        match self {
            Self::Collecting => "Describe your product idea...",
            Self::Clarifying => "Type your answer...",
            Self::Generating => "Generating implementation roadmap...",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Collecting => "collecting",
            Self::Clarifying => "clarifying",
            Self::Generating => "generating",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
