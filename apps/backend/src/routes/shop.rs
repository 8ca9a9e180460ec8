//! Shop endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::review::ReviewStore;
use crate::AppState;
use cardoon_core::shop;

/// Equip request body
#[derive(Debug, Deserialize)]
pub struct EquipRequest {
    pub equipped: bool,
}

/// GET /api/shop
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ShopResponse>> {
    let progress = state.db.find_user_by_id(auth.user_id).await?;
    let catalog: Vec<Item> = state.db.list_items().await?.iter().map(|i| i.to_item()).collect();
    let owned: Vec<UserItem> = state
        .db
        .get_user_items(auth.user_id)
        .await?
        .iter()
        .map(|i| i.to_user_item())
        .collect();

    Ok(Json(ShopResponse {
        gold: progress.gold,
        entries: shop::shop_listing(&catalog, &owned),
    }))
}

/// POST /api/shop/:item_id/buy
pub async fn buy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(item_id): Path<i64>,
) -> Result<Json<ShopEntry>> {
    let item = state
        .db
        .get_item(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item {} not found", item_id)))?
        .to_item();

    let mut progress = state.db.find_user_by_id(auth.user_id).await?;
    let owned: Vec<UserItem> = state
        .db
        .get_user_items(auth.user_id)
        .await?
        .iter()
        .map(|i| i.to_user_item())
        .collect();

    // Reject early with a precise message; the write re-checks both conditions
    let user_item = shop::buy(&item, &mut progress.gold, &owned)?;

    state.db.purchase_item(auth.user_id, &item).await?;

    tracing::info!("User {} bought item {}", auth.user_id, item_id);

    Ok(Json(ShopEntry::UserItem(user_item)))
}

/// POST /api/shop/:item_id/equip
pub async fn equip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(item_id): Path<i64>,
    Json(payload): Json<EquipRequest>,
) -> Result<Json<ShopEntry>> {
    let updated = state
        .db
        .set_item_equipped(auth.user_id, item_id, payload.equipped)
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!("Item {} is not owned", item_id)));
    }

    let owned = state
        .db
        .get_user_items(auth.user_id)
        .await?
        .into_iter()
        .find(|i| i.id == item_id)
        .ok_or_else(|| ApiError::NotFound(format!("Item {} is not owned", item_id)))?;

    Ok(Json(ShopEntry::UserItem(owned.to_user_item())))
}
