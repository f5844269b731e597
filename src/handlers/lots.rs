use axum::extract::{Json, Path, State};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entities::lote;
use crate::handlers::AppState;
use crate::services::lots::{CreateLot, UpdateLot};
use crate::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLotRequest {
    pub producto_id: i32,
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
    pub cantidad_actual: Option<i32>,
    pub activo: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLotRequest {
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
    pub cantidad_actual: i32,
    pub activo: bool,
}

/// List every lot, active or not.
#[utoipa::path(
    get,
    path = "/api/v1/lots",
    responses(
        (status = 200, description = "All lots"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn list_lots(State(state): State<AppState>) -> ApiResult<Vec<lote::Model>> {
    let lots = state.services.lots.list_lots().await?;
    Ok(Json(ApiResponse::success(lots)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lots/{id}",
    responses(
        (status = 200, description = "Lot found"),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn get_lot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<lote::Model> {
    let lot = state.services.lots.get_lot(id).await?;
    Ok(Json(ApiResponse::success(lot)))
}

/// Manual lot entry, outside the purchase flow.
#[utoipa::path(
    post,
    path = "/api/v1/lots",
    request_body = CreateLotRequest,
    responses(
        (status = 200, description = "Lot created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn create_lot(
    State(state): State<AppState>,
    Json(payload): Json<CreateLotRequest>,
) -> ApiResult<lote::Model> {
    let lot = state
        .services
        .lots
        .create_lot(
            payload.producto_id,
            CreateLot {
                lote: payload.lote,
                fecha_caducidad: payload.fecha_caducidad,
                cantidad_actual: payload.cantidad_actual,
                activo: payload.activo,
                detalle_compra_id: None,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(lot)))
}

#[utoipa::path(
    put,
    path = "/api/v1/lots/{id}",
    request_body = UpdateLotRequest,
    responses(
        (status = 200, description = "Lot updated"),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn update_lot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLotRequest>,
) -> ApiResult<lote::Model> {
    let lot = state
        .services
        .lots
        .update_lot(
            id,
            UpdateLot {
                lote: payload.lote,
                fecha_caducidad: payload.fecha_caducidad,
                cantidad_actual: payload.cantidad_actual,
                activo: payload.activo,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(lot)))
}

/// Administrative hard delete; no cascade, no audit trail.
#[utoipa::path(
    delete,
    path = "/api/v1/lots/{id}",
    responses(
        (status = 200, description = "Lot deleted"),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse)
    ),
    tag = "lots"
)]
pub async fn delete_lot(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<()> {
    state.services.lots.delete_lot(id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Next lot the FEFO policy would deplete for a product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/next-lot",
    responses(
        (status = 200, description = "Next depletable lot, or null when none is eligible")
    ),
    tag = "lots"
)]
pub async fn next_depletable_lot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Option<lote::Model>> {
    let lot = state.services.lots.next_depletable_lot(id).await?;
    Ok(Json(ApiResponse::success(lot)))
}
