#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;
use tokio::sync::mpsc;

use tienda_api::db::{establish_connection, run_migrations, DbPool};
use tienda_api::entities::{lote, product};
use tienda_api::events::{Event, EventSender};
use tienda_api::handlers::AppServices;

pub struct TestContext {
    pub db: Arc<DbPool>,
    pub services: AppServices,
    pub events: mpsc::Receiver<Event>,
}

/// Fresh in-memory store with the full schema applied. Each call gets its
/// own database; nothing leaks between tests.
pub async fn setup() -> TestContext {
    let db = establish_connection("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    run_migrations(&db).await.expect("failed to run migrations");
    let db = Arc::new(db);

    let (tx, rx) = mpsc::channel(100);
    let event_sender = EventSender::new(tx);
    let services = AppServices::new(db.clone(), event_sender);

    TestContext {
        db,
        services,
        events: rx,
    }
}

pub async fn create_product(db: &DbPool, nombre: &str) -> product::Model {
    let now = Utc::now();
    product::ActiveModel {
        nombre: Set(nombre.to_string()),
        categoria_id: Set(None),
        precio_compra: Set(Decimal::from(2)),
        precio_venta: Set(Decimal::from(5)),
        codigo_barras: Set(None),
        activo: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert product")
}

pub async fn create_lot(
    db: &DbPool,
    producto_id: i32,
    fecha_caducidad: Option<NaiveDate>,
    cantidad: i32,
) -> lote::Model {
    let now = Utc::now();
    lote::ActiveModel {
        producto_id: Set(producto_id),
        detalle_compra_id: Set(None),
        lote: Set(None),
        fecha_caducidad: Set(fecha_caducidad),
        cantidad_actual: Set(cantidad),
        activo: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert lot")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
