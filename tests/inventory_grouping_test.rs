mod common;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};

use tienda_api::entities::product;

#[tokio::test]
async fn inventory_groups_active_lots_by_product() {
    let ctx = common::setup().await;
    let milk = common::create_product(&ctx.db, "Leche entera").await;
    let bread = common::create_product(&ctx.db, "Pan de caja").await;

    common::create_lot(&ctx.db, milk.id, Some(common::date(2025, 4, 1)), 12).await;
    common::create_lot(&ctx.db, milk.id, None, 8).await;
    common::create_lot(&ctx.db, bread.id, Some(common::date(2025, 2, 15)), 5).await;

    let groups = ctx.services.inventory.grouped_inventory().await.unwrap();
    assert_eq!(groups.len(), 2);

    let milk_group = groups.iter().find(|g| g.product.id == milk.id).unwrap();
    assert_eq!(milk_group.lot_count, 2);
    assert_eq!(milk_group.total_pieces, 20);

    let bread_group = groups.iter().find(|g| g.product.id == bread.id).unwrap();
    assert_eq!(bread_group.lot_count, 1);
    assert_eq!(bread_group.total_pieces, 5);
}

#[tokio::test]
async fn inactive_lots_are_excluded_from_the_rollup() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Yogurt").await;
    let live = common::create_lot(&ctx.db, product.id, None, 9).await;
    let dead = common::create_lot(&ctx.db, product.id, None, 7).await;

    ctx.services
        .lots
        .update_lot(
            dead.id,
            tienda_api::services::lots::UpdateLot {
                lote: dead.lote.clone(),
                fecha_caducidad: dead.fecha_caducidad,
                cantidad_actual: dead.cantidad_actual,
                activo: false,
            },
        )
        .await
        .unwrap();

    let groups = ctx.services.inventory.grouped_inventory().await.unwrap();
    let group = groups.iter().find(|g| g.product.id == product.id).unwrap();
    assert_eq!(group.lot_count, 1);
    assert_eq!(group.total_pieces, 9);
    assert_eq!(group.lotes[0].id, live.id);
}

#[tokio::test]
async fn products_without_lots_still_appear_with_zero_stock() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Producto nuevo").await;

    let groups = ctx.services.inventory.grouped_inventory().await.unwrap();
    let group = groups.iter().find(|g| g.product.id == product.id).unwrap();
    assert_eq!(group.lot_count, 0);
    assert_eq!(group.total_pieces, 0);
    assert!(group.lotes.is_empty());
}

#[tokio::test]
async fn low_stock_flags_active_products_at_or_below_threshold() {
    let ctx = common::setup().await;
    let scarce = common::create_product(&ctx.db, "Cafe molido").await;
    let plenty = common::create_product(&ctx.db, "Arroz").await;
    common::create_lot(&ctx.db, scarce.id, None, 3).await;
    common::create_lot(&ctx.db, plenty.id, None, 40).await;

    // A discontinued product never alerts, however low its counter sits.
    let now = Utc::now();
    let retired = product::ActiveModel {
        nombre: Set("Descontinuado".to_string()),
        categoria_id: Set(None),
        precio_compra: Set(Decimal::ZERO),
        precio_venta: Set(Decimal::ZERO),
        codigo_barras: Set(None),
        activo: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&*ctx.db)
    .await
    .unwrap();

    let alerts = ctx.services.inventory.low_stock(5).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].product.id, scarce.id);
    assert!(alerts.iter().all(|g| g.product.id != retired.id));

    // The boundary is inclusive.
    let alerts = ctx.services.inventory.low_stock(3).await.unwrap();
    assert_eq!(alerts.len(), 1);
    let alerts = ctx.services.inventory.low_stock(2).await.unwrap();
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn lots_for_product_includes_inactive_rows() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Mermelada").await;
    let a = common::create_lot(&ctx.db, product.id, None, 6).await;
    let b = common::create_lot(&ctx.db, product.id, None, 0).await;

    ctx.services
        .lots
        .update_lot(
            b.id,
            tienda_api::services::lots::UpdateLot {
                lote: None,
                fecha_caducidad: None,
                cantidad_actual: 0,
                activo: false,
            },
        )
        .await
        .unwrap();

    let lots = ctx.services.inventory.lots_for_product(product.id).await.unwrap();
    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0].id, a.id);
    assert!(!lots[1].activo);
}
