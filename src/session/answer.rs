use serde::{Deserialize, Serialize};

/// A resolved answer to the pending clarifying question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// One of the question's pre-enumerated options was picked
    Option(String),
    /// The user typed a free-text answer
    Text(String),
}

impl Answer {
    pub fn text(&self) -> &str {
        match self {
            Self::Option(s) | Self::Text(s) => s,
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self, Self::Option(_))
    }
}

/// Raw answer sources available to the presentation layer at the same time.
///
/// An explicit option selection wins over whatever is in the text box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerInput {
    pub selected_option: Option<String>,
    pub typed: Option<String>,
}

impl AnswerInput {
    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            selected_option: None,
            typed: Some(text.into()),
        }
    }

    pub fn option(option: impl Into<String>) -> Self {
        Self {
            selected_option: Some(option.into()),
            typed: None,
        }
    }

    pub fn with_typed(mut self, text: impl Into<String>) -> Self {
        self.typed = Some(text.into());
        self
    }

    /// Pick the answer to submit, or `None` if nothing usable was given
    pub fn resolve(self) -> Option<Answer> {
        if let Some(option) = self.selected_option {
            return Some(Answer::Option(option));
        }
        self.typed
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Answer::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_wins_over_typed_text() {
        let input = AnswerInput::option("Consumers").with_typed("something else");
        assert_eq!(input.resolve(), Some(Answer::Option("Consumers".to_string())));
    }

    #[test]
    fn test_typed_text_is_trimmed() {
        let answer = AnswerInput::typed("  scheduling jobs \n").resolve().unwrap();
        assert_eq!(answer, Answer::Text("scheduling jobs".to_string()));
        assert!(!answer.is_option());
    }

    #[test]
    fn test_blank_input_resolves_to_nothing() {
        assert_eq!(AnswerInput::typed("   ").resolve(), None);
        assert_eq!(AnswerInput::default().resolve(), None);
    }
}
