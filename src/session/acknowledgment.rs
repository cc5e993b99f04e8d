use crate::constants::{ANSWER_ACKNOWLEDGMENTS, OPENING_ACKNOWLEDGMENT, READY_TO_GENERATE};

/// Supplies the canned agent lines spoken between user turns.
///
/// The text is cosmetic; it must never depend on what the user said.
pub trait AcknowledgmentSource: Send + Sync {
    /// Reply to the user's initial request
    fn opening(&self) -> String;

    /// Reply to the answer for the question at `question_index`
    fn acknowledge(&self, question_index: usize) -> String;

    /// Announcement that the catalog is exhausted and generation starts
    fn ready(&self) -> String;
}

/// Cycles through a fixed pool of acknowledgments by question index
#[derive(Debug, Clone)]
pub struct CyclicAcknowledgments {
    opening: String,
    pool: Vec<String>,
    ready: String,
}

impl CyclicAcknowledgments {
    /// An empty pool falls back to the builtin phrases
    pub fn new(opening: impl Into<String>, pool: Vec<String>, ready: impl Into<String>) -> Self {
        let pool = if pool.is_empty() {
            builtin_pool()
        } else {
            pool
        };
        Self {
            opening: opening.into(),
            pool,
            ready: ready.into(),
        }
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }
}

impl Default for CyclicAcknowledgments {
    fn default() -> Self {
        Self::new(OPENING_ACKNOWLEDGMENT, builtin_pool(), READY_TO_GENERATE)
    }
}

impl AcknowledgmentSource for CyclicAcknowledgments {
    fn opening(&self) -> String {
        self.opening.clone()
    }

    fn acknowledge(&self, question_index: usize) -> String {
        self.pool[question_index % self.pool.len()].clone()
    }

    fn ready(&self) -> String {
        self.ready.clone()
    }
}

fn builtin_pool() -> Vec<String> {
    ANSWER_ACKNOWLEDGMENTS.iter().map(|s| s.to_string()).collect()
}
