//! Hero reward endpoint

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::{BonusRequest, UserResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::services::review;
use crate::AppState;

/// POST /api/hero/bonus
/// Stores a defeated enemy's bonus and coins, returns the updated user
pub async fn add_bonus(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<BonusRequest>,
) -> Result<Json<UserResponse>> {
    review::add_hero_bonus(state.db.as_ref(), auth.user_id, &payload).await?;

    tracing::info!(
        "User {} gained {} {} and {} coins",
        auth.user_id,
        payload.amount,
        payload.kind.as_str(),
        payload.coins_drop
    );

    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.to_response(Utc::now().date_naive())))
}
