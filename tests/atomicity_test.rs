mod common;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, TransactionTrait};

use tienda_api::entities::sale_line::ContainerType;
use tienda_api::entities::{sale, sale_line, Lote, Sale, SaleLine};
use tienda_api::errors::ServiceError;
use tienda_api::services::sales::{CreateSale, SaleLineInput};

/// The sale and purchase flows stake everything on the surrounding
/// transaction: an abort after partial writes must leave no trace. This
/// drives the same write shapes the services use and rolls them back.
#[tokio::test]
async fn rolled_back_sale_writes_leave_no_rows() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Cereal").await;
    let lot = common::create_lot(&ctx.db, product.id, None, 10).await;

    let txn = ctx.db.begin().await.unwrap();
    let now = Utc::now();

    let header = sale::ActiveModel {
        fecha: Set(now),
        total: Set(Decimal::from(50)),
        observaciones: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .unwrap();

    sale_line::ActiveModel {
        venta_id: Set(header.id),
        producto_id: Set(product.id),
        cantidad: Set(5),
        precio_unitario: Set(Decimal::from(10)),
        subtotal: Set(Decimal::from(50)),
        tipo_contenedor: Set("unidad".to_string()),
        unidades_por_contenedor: Set(1),
        piezas_vendidas: Set(5),
        lote: Set(None),
        fecha_caducidad: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .unwrap();

    let mut depletion: tienda_api::entities::lote::ActiveModel =
        Lote::find_by_id(lot.id).one(&txn).await.unwrap().unwrap().into();
    depletion.cantidad_actual = Set(5);
    depletion.update(&txn).await.unwrap();

    txn.rollback().await.unwrap();

    assert!(Sale::find().all(&*ctx.db).await.unwrap().is_empty());
    assert!(SaleLine::find().all(&*ctx.db).await.unwrap().is_empty());
    let lot = Lote::find_by_id(lot.id).one(&*ctx.db).await.unwrap().unwrap();
    assert_eq!(lot.cantidad_actual, 10, "depletion must not survive the rollback");
}

/// Forces a storage failure mid-sale to exercise the service's own abort
/// path: dropping the line table makes the line insert fail after the
/// header insert, and the error must roll the header back with it.
#[tokio::test]
async fn a_failed_line_insert_rolls_the_sale_back() {
    let ctx = common::setup().await;
    let product = common::create_product(&ctx.db, "Cereal").await;
    common::create_lot(&ctx.db, product.id, None, 10).await;

    ctx.db
        .execute_unprepared("DROP TABLE detail_ventas")
        .await
        .unwrap();

    let err = ctx
        .services
        .sales
        .create_sale(CreateSale {
            fecha: None,
            total: Decimal::from(50),
            observaciones: None,
            detalles: vec![SaleLineInput {
                producto_id: product.id,
                cantidad: 5,
                precio_unitario: Decimal::from(10),
                tipo_contenedor: ContainerType::Unidad,
                unidades_por_contenedor: None,
                lote: None,
                fecha_caducidad: None,
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::DatabaseError(_)));

    // The header written before the failure must not survive it.
    assert!(Sale::find().all(&*ctx.db).await.unwrap().is_empty());
    let lots = Lote::find().all(&*ctx.db).await.unwrap();
    assert_eq!(lots[0].cantidad_actual, 10);
}
