//! Adventure catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::models::EnemiesResponse;
use crate::AppState;
use cardoon_core::EnemyCatalog;

/// GET /api/adventure/levels/:level_id/enemies
pub async fn enemies(
    State(state): State<AppState>,
    Path(level_id): Path<String>,
) -> Result<Json<EnemiesResponse>> {
    let enemies = state.catalog.enemies_for_level(&level_id)?;

    Ok(Json(EnemiesResponse { level_id, enemies }))
}
