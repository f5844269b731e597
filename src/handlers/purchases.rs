use axum::extract::{Json, Path, State};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{purchase, purchase_line};
use crate::handlers::AppState;
use crate::services::purchases::{CreatePurchase, PurchaseLineInput};
use crate::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseLineRequest {
    pub producto_id: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePurchaseRequest {
    pub proveedor_id: Option<i32>,
    pub fecha: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub observaciones: Option<String>,
    #[serde(default)]
    pub detalles: Vec<PurchaseLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseWithLines {
    pub purchase: purchase::Model,
    pub detalles: Vec<purchase_line::Model>,
}

/// Record a purchase: header, line items, and one minted lot per line,
/// all-or-nothing.
#[utoipa::path(
    post,
    path = "/api/v1/purchases",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 200, description = "Purchase recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "purchases"
)]
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseRequest>,
) -> ApiResult<purchase::Model> {
    let request = CreatePurchase {
        proveedor_id: payload.proveedor_id,
        fecha: payload.fecha,
        total: payload.total,
        observaciones: payload.observaciones,
        detalles: payload
            .detalles
            .into_iter()
            .map(|d| PurchaseLineInput {
                producto_id: d.producto_id,
                cantidad: d.cantidad,
                precio_unitario: d.precio_unitario,
                lote: d.lote,
                fecha_caducidad: d.fecha_caducidad,
            })
            .collect(),
    };

    let purchase = state.services.purchases.create_purchase(request).await?;
    Ok(Json(ApiResponse::success(purchase)))
}

#[utoipa::path(
    get,
    path = "/api/v1/purchases",
    responses((status = 200, description = "All purchases, newest first")),
    tag = "purchases"
)]
pub async fn list_purchases(State(state): State<AppState>) -> ApiResult<Vec<purchase::Model>> {
    let purchases = state.services.purchases.list_purchases().await?;
    Ok(Json(ApiResponse::success(purchases)))
}

#[utoipa::path(
    get,
    path = "/api/v1/purchases/{id}",
    responses(
        (status = 200, description = "Purchase with its line items"),
        (status = 404, description = "Purchase not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchases"
)]
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<PurchaseWithLines> {
    let (purchase, detalles) = state.services.purchases.get_purchase(id).await?;
    Ok(Json(ApiResponse::success(PurchaseWithLines {
        purchase,
        detalles,
    })))
}
