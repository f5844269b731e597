use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::{
    entities::{
        consumo_interno::{self, Entity as ConsumoEntity},
        lote::{self, Entity as LoteEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone)]
pub struct RecordConsumption {
    pub lote_id: i32,
    pub cantidad: i32,
    pub motivo: Option<String>,
    /// Defaults to "now" when omitted.
    pub fecha: Option<DateTime<Utc>>,
}

/// Records internal-use / shrinkage events against a single lot and keeps
/// the lot's active flag in step with its remaining quantity.
#[derive(Clone)]
pub struct ConsumptionService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    write_lock: Arc<Mutex<()>>,
}

impl ConsumptionService {
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

    /// Records a consumption atomically: insert the record, decrement the
    /// lot, deactivate it at zero or below.
    ///
    /// Deliberately permissive: there is no pre-flight bound against the
    /// tracked quantity, because physical counts can disagree with the
    /// ledger and shrinkage must still be recordable. The lot quantity may
    /// go negative; the lot is deactivated so aggregate stock queries
    /// never see it.
    #[instrument(skip(self, request), fields(lote_id = request.lote_id))]
    pub async fn record_consumption(
        &self,
        request: RecordConsumption,
    ) -> Result<consumo_interno::Model, ServiceError> {
        if request.cantidad <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "quantity must be positive, got {}",
                request.cantidad
            )));
        }

        let _guard = self.write_lock.lock().await;

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let lot = LoteEntity::find_by_id(request.lote_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", request.lote_id)))?;

        let record = consumo_interno::ActiveModel {
            lote_id: Set(request.lote_id),
            cantidad: Set(request.cantidad),
            motivo: Set(request.motivo.clone()),
            fecha: Set(request.fecha.unwrap_or(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let record = record.insert(&txn).await?;

        let new_qty = lot.cantidad_actual - request.cantidad;
        let drained = new_qty <= 0;
        let producto_id = lot.producto_id;

        let mut update: lote::ActiveModel = lot.into();
        update.cantidad_actual = Set(new_qty);
        if drained {
            update.activo = Set(false);
        }
        update.updated_at = Set(now);
        update.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::ConsumptionRecorded {
                consumo_id: record.id,
                lote_id: record.lote_id,
                cantidad: record.cantidad,
            })
            .await;
        if drained {
            self.event_sender
                .send_or_log(Event::LotDeactivated {
                    lote_id: record.lote_id,
                    producto_id,
                })
                .await;
        }

        info!(
            "Consumption {} recorded: {} pieces from lot {}",
            record.id, record.cantidad, record.lote_id
        );
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn list_consumptions(&self) -> Result<Vec<consumo_interno::Model>, ServiceError> {
        let records = ConsumoEntity::find()
            .order_by_desc(consumo_interno::Column::Fecha)
            .all(&*self.db)
            .await?;
        Ok(records)
    }
}
