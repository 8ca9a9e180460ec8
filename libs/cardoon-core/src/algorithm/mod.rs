//! Review interval scheduling.

pub mod streak;

pub use streak::StreakScheduler;

use crate::error::Result;
use crate::types::ReviewCard;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of scheduling a card after an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulingResult {
    pub new_interval: i64,
    pub answer_streak: u32,
    pub next_review: DateTime<Utc>,
}

/// Trait for interval scheduling algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next interval and streak after an answer.
    ///
    /// `answers_ratio` is the user's accuracy before this answer is recorded.
    fn schedule(
        &self,
        card: &ReviewCard,
        answers_ratio: f64,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult>;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "streak" => Some(Box::new(StreakScheduler::default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(get_algorithm("streak").map(|a| a.name()), Some("streak"));
        assert!(get_algorithm("sm2").is_none());
    }
}
