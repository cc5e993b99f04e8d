use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::utils::DossierError;

/// A canned question asked while clarifying the user's request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    pub id: String,
    pub prompt: String,
    /// Quick answers offered alongside free text. Empty means free text only.
    #[serde(default)]
    pub options: Vec<String>,
}

impl ClarifyingQuestion {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

static BUILTIN_QUESTIONS: Lazy<Arc<[ClarifyingQuestion]>> = Lazy::new(|| {
    vec![
        ClarifyingQuestion::new("q1", "Who are the primary users of this product?").with_options([
            "Small business owners",
            "Enterprise teams",
            "Consumers",
            "Field workers",
        ]),
        ClarifyingQuestion::new(
            "q2",
            "What's the most critical workflow they need to accomplish?",
        ),
        ClarifyingQuestion::new(
            "q3",
            "Do you have existing systems this needs to integrate with?",
        )
        .with_options([
            "Accounting software",
            "CRM",
            "Calendar/scheduling",
            "Payment processing",
            "None yet",
        ]),
    ]
    .into()
});

/// Fixed, ordered list of clarifying questions, consulted by index
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Arc<[ClarifyingQuestion]>,
}

impl QuestionCatalog {
    /// Build a catalog. At least one question is required.
    pub fn new(questions: Vec<ClarifyingQuestion>) -> Result<Self, DossierError> {
        if questions.is_empty() {
            return Err(DossierError::ConfigError(
                "question catalog must contain at least one question".to_string(),
            ));
        }
        if let Some(q) = questions.iter().find(|q| q.prompt.trim().is_empty()) {
            return Err(DossierError::ConfigError(format!(
                "question '{}' has an empty prompt",
                q.id
            )));
        }
        Ok(Self {
            questions: questions.into(),
        })
    }

    /// The product-discovery questions used when nothing is configured
    pub fn builtin() -> Self {
        Self {
            questions: Arc::clone(&BUILTIN_QUESTIONS),
        }
    }

    pub fn get(&self, index: usize) -> Option<&ClarifyingQuestion> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClarifyingQuestion> {
        self.questions.iter()
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = QuestionCatalog::builtin();
        assert_eq!(catalog.len(), 3);

        let first = catalog.get(0).unwrap();
        assert_eq!(first.id, "q1");
        assert_eq!(first.options.len(), 4);
        assert!(first.offers("Consumers"));

        assert!(!catalog.get(1).unwrap().has_options());
        assert_eq!(catalog.get(2).unwrap().options.len(), 5);
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            QuestionCatalog::new(Vec::new()),
            Err(DossierError::ConfigError(_))
        ));
    }

    #[test]
    fn test_blank_prompt_rejected() {
        let result = QuestionCatalog::new(vec![ClarifyingQuestion::new("q1", "   ")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_deserializes_without_options() {
        let q: ClarifyingQuestion =
            toml::from_str("id = \"scope\"\nprompt = \"How big is the team?\"").unwrap();
        assert_eq!(q.id, "scope");
        assert!(q.options.is_empty());
    }
}
