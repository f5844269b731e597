use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::{
    entities::{
        lote,
        purchase::{self, Entity as PurchaseEntity},
        purchase_line::{self, Entity as PurchaseLineEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone)]
pub struct PurchaseLineInput {
    pub producto_id: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CreatePurchase {
    pub proveedor_id: Option<i32>,
    /// Defaults to "now" when omitted.
    pub fecha: Option<DateTime<Utc>>,
    /// Caller-supplied total, trusted as given.
    pub total: Decimal,
    pub observaciones: Option<String>,
    pub detalles: Vec<PurchaseLineInput>,
}

/// Records stock-in transactions: one purchase header, its line items, and
/// one freshly minted lot per line, all in a single transaction.
#[derive(Clone)]
pub struct PurchaseService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    write_lock: Arc<Mutex<()>>,
}

impl PurchaseService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        write_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            db,
            event_sender,
            write_lock,
        }
    }

    /// Creates a purchase atomically. Purchases carry no stock
    /// precondition: they are always accepted once the payload validates.
    #[instrument(skip(self, request), fields(lines = request.detalles.len()))]
    pub async fn create_purchase(
        &self,
        request: CreatePurchase,
    ) -> Result<purchase::Model, ServiceError> {
        validate_purchase(&request)?;

        // Serialize writes: the FEFO ledger assumes one writer at a time.
        let _guard = self.write_lock.lock().await;

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let header = purchase::ActiveModel {
            proveedor_id: Set(request.proveedor_id),
            fecha: Set(request.fecha.unwrap_or(now)),
            total: Set(request.total),
            observaciones: Set(request.observaciones.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let header = header.insert(&txn).await.map_err(|e| {
            error!("Failed to insert purchase header: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        let line_count = request.detalles.len();
        for detalle in request.detalles {
            let subtotal = Decimal::from(detalle.cantidad) * detalle.precio_unitario;
            let line = purchase_line::ActiveModel {
                compra_id: Set(header.id),
                producto_id: Set(detalle.producto_id),
                cantidad: Set(detalle.cantidad),
                precio_unitario: Set(detalle.precio_unitario),
                subtotal: Set(subtotal),
                lote: Set(detalle.lote.clone()),
                fecha_caducidad: Set(detalle.fecha_caducidad),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            let line = line.insert(&txn).await?;

            // Mint the lot this line brings into stock.
            let lot = lote::ActiveModel {
                producto_id: Set(detalle.producto_id),
                detalle_compra_id: Set(Some(line.id)),
                lote: Set(detalle.lote),
                fecha_caducidad: Set(detalle.fecha_caducidad),
                cantidad_actual: Set(detalle.cantidad),
                activo: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            lot.insert(&txn).await?;
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PurchaseRecorded {
                purchase_id: header.id,
                line_count,
            })
            .await;
        info!(
            "Purchase {} recorded with {} line items",
            header.id, line_count
        );
        Ok(header)
    }

    #[instrument(skip(self))]
    pub async fn list_purchases(&self) -> Result<Vec<purchase::Model>, ServiceError> {
        let purchases = PurchaseEntity::find()
            .order_by_desc(purchase::Column::Fecha)
            .all(&*self.db)
            .await?;
        Ok(purchases)
    }

    /// Fetches a purchase header with its line items.
    #[instrument(skip(self))]
    pub async fn get_purchase(
        &self,
        id: i32,
    ) -> Result<(purchase::Model, Vec<purchase_line::Model>), ServiceError> {
        let header = PurchaseEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase {} not found", id)))?;

        let lines = PurchaseLineEntity::find()
            .filter(purchase_line::Column::CompraId.eq(id))
            .order_by_asc(purchase_line::Column::Id)
            .all(&*self.db)
            .await?;

        Ok((header, lines))
    }
}

fn validate_purchase(request: &CreatePurchase) -> Result<(), ServiceError> {
    for (idx, detalle) in request.detalles.iter().enumerate() {
        if detalle.cantidad <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "line {}: quantity must be positive, got {}",
                idx, detalle.cantidad
            )));
        }
        if detalle.precio_unitario < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "line {}: unit price must not be negative",
                idx
            )));
        }
    }
    Ok(())
}
