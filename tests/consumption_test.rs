mod common;

use sea_orm::EntityTrait;

use tienda_api::entities::{ConsumoInterno, Lote};
use tienda_api::errors::ServiceError;
use tienda_api::services::consumption::RecordConsumption;

fn consume(lote_id: i32, cantidad: i32) -> RecordConsumption {
    RecordConsumption {
        lote_id,
        cantidad,
        motivo: Some("merma".to_string()),
        fecha: None,
    }
}

#[tokio::test]
async fn consumption_decrements_the_named_lot_only() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Queso panela").await;
    let target = common::create_lot(&ctx.db, product.id, Some(common::date(2025, 6, 1)), 10).await;
    let other = common::create_lot(&ctx.db, product.id, Some(common::date(2025, 5, 1)), 10).await;

    let record = ctx
        .services
        .consumption
        .record_consumption(consume(target.id, 3))
        .await
        .unwrap();
    assert_eq!(record.lote_id, target.id);
    assert_eq!(record.cantidad, 3);
    assert_eq!(record.motivo.as_deref(), Some("merma"));

    // Consumption names its lot directly; FEFO order is irrelevant here,
    // so the sooner-expiring sibling stays untouched.
    let target = Lote::find_by_id(target.id).one(&*ctx.db).await.unwrap().unwrap();
    let other = Lote::find_by_id(other.id).one(&*ctx.db).await.unwrap().unwrap();
    assert_eq!(target.cantidad_actual, 7);
    assert!(target.activo);
    assert_eq!(other.cantidad_actual, 10);
}

#[tokio::test]
async fn draining_a_lot_through_consumption_deactivates_it() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Crema").await;
    let lot = common::create_lot(&ctx.db, product.id, None, 4).await;

    ctx.services
        .consumption
        .record_consumption(consume(lot.id, 4))
        .await
        .unwrap();

    let lot = Lote::find_by_id(lot.id).one(&*ctx.db).await.unwrap().unwrap();
    assert_eq!(lot.cantidad_actual, 0);
    assert!(!lot.activo);
}

#[tokio::test]
async fn consumption_may_overshoot_into_negative_stock() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Jamon").await;
    let lot = common::create_lot(&ctx.db, product.id, None, 2).await;

    // No pre-flight on this path: the recorded loss wins over the counter.
    ctx.services
        .consumption
        .record_consumption(consume(lot.id, 5))
        .await
        .unwrap();

    let lot = Lote::find_by_id(lot.id).one(&*ctx.db).await.unwrap().unwrap();
    assert_eq!(lot.cantidad_actual, -3);
    assert!(!lot.activo, "negative stock must not stay sellable");
}

#[tokio::test]
async fn non_positive_quantities_are_rejected_without_writing() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Tortillas").await;
    let lot = common::create_lot(&ctx.db, product.id, None, 8).await;

    for cantidad in [0, -2] {
        let err = ctx
            .services
            .consumption
            .record_consumption(consume(lot.id, cantidad))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    assert!(ConsumoInterno::find().all(&*ctx.db).await.unwrap().is_empty());
    let lot = Lote::find_by_id(lot.id).one(&*ctx.db).await.unwrap().unwrap();
    assert_eq!(lot.cantidad_actual, 8);
}

#[tokio::test]
async fn consuming_a_missing_lot_is_not_found() {
    let ctx = common::setup().await;

    let err = ctx
        .services
        .consumption
        .record_consumption(consume(9999, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(ConsumoInterno::find().all(&*ctx.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_lists_recorded_consumptions() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Leche entera").await;
    let lot = common::create_lot(&ctx.db, product.id, None, 20).await;

    ctx.services
        .consumption
        .record_consumption(consume(lot.id, 2))
        .await
        .unwrap();
    ctx.services
        .consumption
        .record_consumption(RecordConsumption {
            lote_id: lot.id,
            cantidad: 1,
            motivo: None,
            fecha: None,
        })
        .await
        .unwrap();

    let history = ctx.services.consumption.list_consumptions().await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|c| c.lote_id == lot.id));
}
