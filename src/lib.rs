//! tienda-api library
//!
//! Point-of-sale and lot-level inventory backend for a single small
//! retail store: purchases mint dated lots, sales deplete them
//! First-Expired-First-Out, shrinkage is recorded per lot.
#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Uniform response envelope: every operation reports `success` and, on
/// failure, a `message` the UI surfaces directly.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Routes for the v1 API surface.
pub fn api_v1_routes() -> Router<AppState> {
    let lots = Router::new()
        .route(
            "/lots",
            get(handlers::lots::list_lots).post(handlers::lots::create_lot),
        )
        .route(
            "/lots/:id",
            get(handlers::lots::get_lot)
                .put(handlers::lots::update_lot)
                .delete(handlers::lots::delete_lot),
        );

    let purchases = Router::new()
        .route(
            "/purchases",
            get(handlers::purchases::list_purchases).post(handlers::purchases::create_purchase),
        )
        .route("/purchases/:id", get(handlers::purchases::get_purchase));

    let sales = Router::new()
        .route(
            "/sales",
            get(handlers::sales::list_sales).post(handlers::sales::create_sale),
        )
        .route("/sales/:id", get(handlers::sales::get_sale));

    let consumptions = Router::new().route(
        "/consumptions",
        get(handlers::consumption::list_consumptions)
            .post(handlers::consumption::record_consumption),
    );

    let inventory = Router::new()
        .route("/inventory", get(handlers::inventory::grouped_inventory))
        .route("/inventory/low-stock", get(handlers::inventory::low_stock));

    let products = Router::new()
        .route("/products", get(handlers::products::list_products))
        .route("/products/:id", get(handlers::products::get_product))
        .route(
            "/products/:id/lots",
            get(handlers::inventory::lots_for_product),
        )
        .route(
            "/products/:id/next-lot",
            get(handlers::lots::next_depletable_lot),
        );

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(lots)
        .merge(purchases)
        .merge(sales)
        .merge(consumptions)
        .merge(inventory)
        .merge(products)
}

async fn api_status() -> ApiResult<Value> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "tienda-api",
        "timestamp": Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": { "database": db_status },
        "timestamp": Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(health_data)))
}
