use axum::extract::{Json, Path, State};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::sale_line::ContainerType;
use crate::entities::{sale, sale_line};
use crate::handlers::AppState;
use crate::services::sales::{CreateSale, SaleLineInput};
use crate::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaleLineRequest {
    pub producto_id: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub tipo_contenedor: ContainerType,
    pub unidades_por_contenedor: Option<i32>,
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSaleRequest {
    pub fecha: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub observaciones: Option<String>,
    #[serde(default)]
    pub detalles: Vec<SaleLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleWithLines {
    pub sale: sale::Model,
    pub detalles: Vec<sale_line::Model>,
}

/// Record a sale. Verifies aggregate stock per line before writing; a
/// shortfall rejects the whole sale with the product and the required vs.
/// available piece counts.
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 200, description = "Sale recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> ApiResult<sale::Model> {
    let request = CreateSale {
        fecha: payload.fecha,
        total: payload.total,
        observaciones: payload.observaciones,
        detalles: payload
            .detalles
            .into_iter()
            .map(|d| SaleLineInput {
                producto_id: d.producto_id,
                cantidad: d.cantidad,
                precio_unitario: d.precio_unitario,
                tipo_contenedor: d.tipo_contenedor,
                unidades_por_contenedor: d.unidades_por_contenedor,
                lote: d.lote,
                fecha_caducidad: d.fecha_caducidad,
            })
            .collect(),
    };

    let sale = state.services.sales.create_sale(request).await?;
    Ok(Json(ApiResponse::success(sale)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sales",
    responses((status = 200, description = "All sales, newest first")),
    tag = "sales"
)]
pub async fn list_sales(State(state): State<AppState>) -> ApiResult<Vec<sale::Model>> {
    let sales = state.services.sales.list_sales().await?;
    Ok(Json(ApiResponse::success(sales)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    responses(
        (status = 200, description = "Sale with its line items"),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<SaleWithLines> {
    let (sale, detalles) = state.services.sales.get_sale(id).await?;
    Ok(Json(ApiResponse::success(SaleWithLines { sale, detalles })))
}
