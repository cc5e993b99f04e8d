use async_trait::async_trait;
use std::time::Duration;

use crate::app::TimingConfig;

/// Waits out the simulated thinking period between conversation steps
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, _duration: Duration) {}
}

/// Delays applied at each step of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Before acknowledging the initial request
    pub opening_ack: Duration,
    /// Between the opening acknowledgment and entering Clarifying
    pub enter_clarifying: Duration,
    /// Before a question prompt is shown
    pub ask_question: Duration,
    /// Before acknowledging an answer
    pub answer_ack: Duration,
    /// Between an acknowledgment and the next question (or the ready line)
    pub next_question: Duration,
    /// Simulated roadmap generation time
    pub generation: Duration,
}

impl Timing {
    /// All delays zero
    pub fn instant() -> Self {
        Self {
            opening_ack: Duration::ZERO,
            enter_clarifying: Duration::ZERO,
            ask_question: Duration::ZERO,
            answer_ack: Duration::ZERO,
            next_question: Duration::ZERO,
            generation: Duration::ZERO,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}

impl From<&TimingConfig> for Timing {
    fn from(config: &TimingConfig) -> Self {
        Self {
            opening_ack: Duration::from_millis(config.opening_ack_ms),
            enter_clarifying: Duration::from_millis(config.enter_clarifying_ms),
            ask_question: Duration::from_millis(config.ask_question_ms),
            answer_ack: Duration::from_millis(config.answer_ack_ms),
            next_question: Duration::from_millis(config.next_question_ms),
            generation: Duration::from_millis(config.generation_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing_matches_config_defaults() {
        let timing = Timing::default();
        assert_eq!(timing.opening_ack, Duration::from_millis(1500));
        assert_eq!(timing.enter_clarifying, Duration::from_millis(800));
        assert_eq!(timing.ask_question, Duration::from_millis(500));
        assert_eq!(timing.answer_ack, Duration::from_millis(1000));
        assert_eq!(timing.next_question, Duration::from_millis(600));
        assert_eq!(timing.generation, Duration::from_millis(2500));
    }

    #[tokio::test]
    async fn test_tokio_pacer_waits() {
        let start = std::time::Instant::now();
        TokioPacer.pause(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_instant_pacer_returns_immediately() {
        let start = std::time::Instant::now();
        InstantPacer.pause(Duration::from_secs(60)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
