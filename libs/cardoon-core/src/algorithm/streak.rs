//! Streak scheduler.
//!
//! Correct answers grow the interval super-linearly with the answer streak:
//!
//! ```text
//! m = ratio_floor + answers_ratio
//! correct: interval' = floor(interval * m * (growth_constant + streak)) + 1
//! wrong:   interval' = floor(interval / 2 * min(m, 1)) + 1
//! ```
//!
//! A wrong answer halves the interval and a weak accuracy history shrinks it
//! further. On that branch `m` is clamped to 1 on purpose: with a ratio above
//! 0.5 the unclamped `floor(interval / 2 * m) + 1` would exceed
//! `ceil(interval / 2) + 1`, the bound a wrong answer must stay under.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::error::{CoreError, Result};
use crate::types::ReviewCard;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Streak scheduler with configurable parameters. Intervals are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakScheduler {
    pub ratio_floor: f64,
    pub growth_constant: f64,
    pub maximum_interval: i64,
}

impl Default for StreakScheduler {
    fn default() -> Self {
        Self {
            ratio_floor: 0.5,
            growth_constant: 1.618,
            // 100 years
            maximum_interval: 100 * 365 * 86_400,
        }
    }
}

impl SpacedRepetitionAlgorithm for StreakScheduler {
    fn name(&self) -> &'static str {
        "streak"
    }

    fn schedule(
        &self,
        card: &ReviewCard,
        answers_ratio: f64,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult> {
        if card.interval < 1 {
            return Err(CoreError::validation(format!(
                "card {} has interval {}, expected at least 1 second",
                card.card_id, card.interval
            )));
        }
        if !(0.0..=1.0).contains(&answers_ratio) {
            return Err(CoreError::validation(format!(
                "answers ratio {answers_ratio} outside [0, 1]"
            )));
        }

        let answer_streak = if is_correct {
            card.answer_streak.saturating_add(1)
        } else {
            0
        };
        let new_interval = self.next_interval(card.interval, answers_ratio, is_correct, answer_streak);
        if new_interval < 1 {
            tracing::error!(card_id = card.card_id, new_interval, "scheduled interval below 1");
            return Err(CoreError::inconsistent(format!(
                "scheduled interval {new_interval} for card {}",
                card.card_id
            )));
        }

        let next_review = Duration::try_seconds(new_interval)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| {
                CoreError::inconsistent(format!("next review overflows for interval {new_interval}"))
            })?;

        Ok(SchedulingResult {
            new_interval,
            answer_streak,
            next_review,
        })
    }
}

impl StreakScheduler {
    /// Accuracy-based growth multiplier, in `[ratio_floor, ratio_floor + 1]`.
    pub fn ratio_multiplier(&self, answers_ratio: f64) -> f64 {
        self.ratio_floor + answers_ratio
    }

    /// New interval in seconds. `streak` is the streak after this answer.
    pub fn next_interval(&self, interval: i64, answers_ratio: f64, is_correct: bool, streak: u32) -> i64 {
        let multiplier = self.ratio_multiplier(answers_ratio);
        let raw = if is_correct {
            interval as f64 * multiplier * (self.growth_constant + streak as f64)
        } else {
            (interval as f64 / 2.0) * multiplier.min(1.0)
        };
        // float -> int casts saturate
        (raw.floor() as i64).saturating_add(1).min(self.maximum_interval)
    }
}
