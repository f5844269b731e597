use axum::extract::{Json, Path, State};

use crate::entities::product;
use crate::handlers::AppState;
use crate::{ApiResponse, ApiResult};

#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses((status = 200, description = "Product catalog, alphabetical")),
    tag = "products"
)]
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<product::Model>> {
    let products = state.services.products.list_products().await?;
    Ok(Json(ApiResponse::success(products)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    responses(
        (status = 200, description = "Product found"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<product::Model> {
    let product = state.services.products.get_product(id).await?;
    Ok(Json(ApiResponse::success(product)))
}
