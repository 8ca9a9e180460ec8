//! Card and review endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::review;
use crate::AppState;

const DEFAULT_DUE_LIMIT: i64 = 50;
const MAX_DUE_LIMIT: i64 = 500;

/// POST /api/cards
/// Creates a card and attaches it to the caller, due immediately
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<Json<CardResponse>> {
    if payload.question.trim().is_empty() || payload.answer.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Question and answer must not be empty".to_string(),
        ));
    }

    let review = ReviewCard::new(0, state.config.initial_interval_secs, Utc::now())?;
    let card = state
        .db
        .create_card(auth.user_id, &payload.question, &payload.answer, &review)
        .await?;

    Ok(Json(card.to_response()))
}

/// GET /api/cards/due
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<DueCardsQuery>,
) -> Result<Json<DueCardsResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_DUE_LIMIT).clamp(1, MAX_DUE_LIMIT);
    let cards = state
        .db
        .get_due_cards(auth.user_id, Utc::now(), limit)
        .await?;

    Ok(Json(DueCardsResponse {
        cards: cards.iter().map(|c| c.to_response()).collect(),
    }))
}

/// POST /api/cards/:card_id/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(card_id): Path<i64>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let response = review::submit_answer(
        state.db.as_ref(),
        state.scheduler.as_ref(),
        auth.user_id,
        card_id,
        payload.is_correct,
        Utc::now(),
    )
    .await?;

    Ok(Json(response))
}
