//! Answer bookkeeping: applies a scheduling result and its rewards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::algorithm::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::error::{CoreError, Result};
use crate::types::{ReviewCard, UserProgress};

/// Gold granted for a correct answer before item multipliers.
pub const GOLD_PER_CORRECT_ANSWER: f64 = 1.0;

/// What a single answer changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
    pub scheduling: SchedulingResult,
    pub previous_interval: i64,
    pub score_awarded: u64,
    pub gold_awarded: f64,
    pub daily_goal_completed: bool,
}

/// Apply an answer to a card and to the user's progress.
///
/// The accuracy ratio used for scheduling is the one before this answer is
/// recorded. Correct answers award score equal to the previous interval, gold
/// scaled by `gold_multiplier`, and one unit of daily goal progress. Nothing is
/// mutated when scheduling fails.
pub fn apply_answer(
    algorithm: &dyn SpacedRepetitionAlgorithm,
    card: &mut ReviewCard,
    progress: &mut UserProgress,
    is_correct: bool,
    gold_multiplier: f64,
    now: DateTime<Utc>,
) -> Result<ReviewOutcome> {
    if !gold_multiplier.is_finite() || gold_multiplier < 0.0 {
        return Err(CoreError::validation(format!(
            "gold multiplier {gold_multiplier} must be a non-negative number"
        )));
    }

    let ratio = progress.accuracy.answers_ratio();
    let scheduling = algorithm.schedule(card, ratio, is_correct, now)?;
    let previous_interval = card.interval;

    card.interval = scheduling.new_interval;
    card.answer_streak = scheduling.answer_streak;
    card.last_reviewed = Some(now);
    card.next_review = scheduling.next_review;

    progress.accuracy.record(is_correct);

    let mut outcome = ReviewOutcome {
        scheduling,
        previous_interval,
        score_awarded: 0,
        gold_awarded: 0.0,
        daily_goal_completed: false,
    };

    if is_correct {
        let today = now.date_naive();
        let was_complete = progress.daily_goal.is_complete_on(today);
        outcome.score_awarded = previous_interval.max(0) as u64;
        outcome.gold_awarded = GOLD_PER_CORRECT_ANSWER * gold_multiplier;
        progress.score = progress.score.saturating_add(outcome.score_awarded);
        progress.gold += outcome.gold_awarded;
        progress.daily_goal.record(today);
        outcome.daily_goal_completed = !was_complete && progress.daily_goal.is_complete();
    }

    tracing::debug!(
        card_id = card.card_id,
        is_correct,
        interval = card.interval,
        streak = card.answer_streak,
        "answer applied"
    );

    Ok(outcome)
}
