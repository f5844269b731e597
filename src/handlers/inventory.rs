use axum::extract::{Json, Path, Query, State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entities::lote;
use crate::handlers::AppState;
use crate::services::inventory::InventoryGroup;
use crate::{ApiResponse, ApiResult};

const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct LowStockQuery {
    /// Products at or below this total piece count are reported.
    pub threshold: Option<i64>,
}

/// Grouped inventory: per product, its active lots, lot count, and total
/// remaining pieces.
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    responses(
        (status = 200, description = "Inventory grouped by product"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn grouped_inventory(State(state): State<AppState>) -> ApiResult<Vec<InventoryGroup>> {
    let groups = state.services.inventory.grouped_inventory().await?;
    Ok(Json(ApiResponse::success(groups)))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/low-stock",
    params(LowStockQuery),
    responses((status = 200, description = "Active products at or below the threshold")),
    tag = "inventory"
)]
pub async fn low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> ApiResult<Vec<InventoryGroup>> {
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let groups = state.services.inventory.low_stock(threshold).await?;
    Ok(Json(ApiResponse::success(groups)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/lots",
    responses((status = 200, description = "All lots for the product, active or not")),
    tag = "inventory"
)]
pub async fn lots_for_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<lote::Model>> {
    let lots = state.services.inventory.lots_for_product(id).await?;
    Ok(Json(ApiResponse::success(lots)))
}
