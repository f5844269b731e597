use axum::extract::{Json, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entities::consumo_interno;
use crate::handlers::AppState;
use crate::services::consumption::RecordConsumption;
use crate::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordConsumptionRequest {
    pub lote_id: i32,
    pub cantidad: i32,
    pub motivo: Option<String>,
    pub fecha: Option<DateTime<Utc>>,
}

/// Record an internal-consumption / shrinkage event against a lot.
#[utoipa::path(
    post,
    path = "/api/v1/consumptions",
    request_body = RecordConsumptionRequest,
    responses(
        (status = 200, description = "Consumption recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Lot not found", body = crate::errors::ErrorResponse)
    ),
    tag = "consumptions"
)]
pub async fn record_consumption(
    State(state): State<AppState>,
    Json(payload): Json<RecordConsumptionRequest>,
) -> ApiResult<consumo_interno::Model> {
    let record = state
        .services
        .consumption
        .record_consumption(RecordConsumption {
            lote_id: payload.lote_id,
            cantidad: payload.cantidad,
            motivo: payload.motivo,
            fecha: payload.fecha,
        })
        .await?;
    Ok(Json(ApiResponse::success(record)))
}

#[utoipa::path(
    get,
    path = "/api/v1/consumptions",
    responses((status = 200, description = "All consumption records, newest first")),
    tag = "consumptions"
)]
pub async fn list_consumptions(
    State(state): State<AppState>,
) -> ApiResult<Vec<consumo_interno::Model>> {
    let records = state.services.consumption.list_consumptions().await?;
    Ok(Json(ApiResponse::success(records)))
}
