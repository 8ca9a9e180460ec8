//! Answer submission and hero rewards over a persistence collaborator.
//!
//! Writes are sequential and not wrapped in a transaction: the review card is
//! saved before the user. If the user write fails, the card keeps its new
//! interval while score, gold, accuracy and daily goal stay at their old
//! values. The error is returned to the caller and logged; nothing is rolled
//! back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use cardoon_core::{apply_answer, gold_multiplier, BonusRequest, SpacedRepetitionAlgorithm};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::*;

/// Read-modify-write access to review cards and user progress.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find_card_by_id(&self, user_id: Uuid, card_id: i64) -> Result<ReviewCard>;

    async fn save_card(&self, user_id: Uuid, card: &ReviewCard) -> Result<()>;

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<UserProgress>;

    async fn save_user(&self, user_id: Uuid, progress: &UserProgress) -> Result<()>;

    async fn equipped_items(&self, user_id: Uuid) -> Result<Vec<UserItem>>;
}

#[async_trait]
impl ReviewStore for Database {
    async fn find_card_by_id(&self, user_id: Uuid, card_id: i64) -> Result<ReviewCard> {
        self.get_review_card(user_id, card_id)
            .await?
            .map(|c| c.to_core())
            .ok_or_else(|| ApiError::NotFound(format!("Card {} not found", card_id)))
    }

    async fn save_card(&self, user_id: Uuid, card: &ReviewCard) -> Result<()> {
        self.upsert_review_card(user_id, card).await
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<UserProgress> {
        self.get_user(user_id)
            .await?
            .map(|u| u.to_progress())
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))
    }

    async fn save_user(&self, user_id: Uuid, progress: &UserProgress) -> Result<()> {
        self.update_user_progress(user_id, progress).await
    }

    async fn equipped_items(&self, user_id: Uuid) -> Result<Vec<UserItem>> {
        Ok(self
            .get_user_items(user_id)
            .await?
            .iter()
            .filter(|i| i.equipped)
            .map(|i| i.to_user_item())
            .collect())
    }
}

/// Schedule a card after an answer and record the rewards.
pub async fn submit_answer(
    store: &dyn ReviewStore,
    algorithm: &dyn SpacedRepetitionAlgorithm,
    user_id: Uuid,
    card_id: i64,
    is_correct: bool,
    now: DateTime<Utc>,
) -> Result<AnswerResponse> {
    let mut card = store.find_card_by_id(user_id, card_id).await?;
    let mut progress = store.find_user_by_id(user_id).await?;

    let multiplier = if is_correct {
        gold_multiplier(&store.equipped_items(user_id).await?)
    } else {
        1.0
    };

    let outcome = apply_answer(algorithm, &mut card, &mut progress, is_correct, multiplier, now)?;

    store.save_card(user_id, &card).await?;
    if let Err(err) = store.save_user(user_id, &progress).await {
        tracing::warn!(
            "card {} saved but progress for user {} was not: {}",
            card_id,
            user_id,
            err
        );
        return Err(err);
    }

    tracing::debug!(
        "user {} answered card {} (correct: {}), next interval {}s",
        user_id,
        card_id,
        is_correct,
        card.interval
    );

    Ok(AnswerResponse {
        card,
        outcome,
        progress,
    })
}

/// Apply a defeated enemy's bonus and coins to the stored profile.
pub async fn add_hero_bonus(
    store: &dyn ReviewStore,
    user_id: Uuid,
    request: &BonusRequest,
) -> Result<UserProgress> {
    if !request.amount.is_finite() || request.amount < 0.0 {
        return Err(ApiError::BadRequest(format!(
            "bonus amount {} must be a non-negative number",
            request.amount
        )));
    }

    let mut progress = store.find_user_by_id(user_id).await?;
    progress.apply_enemy_reward(request);
    store.save_user(user_id, &progress).await?;

    Ok(progress)
}
