use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::NullOrdering;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    entities::lote::{self, Entity as LoteEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Fields accepted when creating a lot directly (manual lot entry).
#[derive(Debug, Clone, Default)]
pub struct CreateLot {
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
    /// Defaults to 0 when unspecified.
    pub cantidad_actual: Option<i32>,
    /// Defaults to true when unspecified.
    pub activo: Option<bool>,
    pub detalle_compra_id: Option<i32>,
}

/// Full replacement of a lot's mutable fields. The active flag is taken
/// as given; only the sale and consumption paths derive it from quantity.
#[derive(Debug, Clone)]
pub struct UpdateLot {
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
    pub cantidad_actual: i32,
    pub activo: bool,
}

/// Owns the durable representation of inventory lots.
#[derive(Clone)]
pub struct LotService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl LotService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Returns every lot regardless of active state.
    #[instrument(skip(self))]
    pub async fn list_lots(&self) -> Result<Vec<lote::Model>, ServiceError> {
        let lots = LoteEntity::find()
            .order_by_asc(lote::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(lots)
    }

    #[instrument(skip(self))]
    pub async fn get_lot(&self, id: i32) -> Result<lote::Model, ServiceError> {
        LoteEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", id)))
    }

    /// Inserts a new lot row.
    #[instrument(skip(self, fields))]
    pub async fn create_lot(
        &self,
        producto_id: i32,
        fields: CreateLot,
    ) -> Result<lote::Model, ServiceError> {
        let now = Utc::now();
        let lot = lote::ActiveModel {
            producto_id: Set(producto_id),
            detalle_compra_id: Set(fields.detalle_compra_id),
            lote: Set(fields.lote),
            fecha_caducidad: Set(fields.fecha_caducidad),
            cantidad_actual: Set(fields.cantidad_actual.unwrap_or(0)),
            activo: Set(fields.activo.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = lot.insert(&*self.db).await?;
        self.event_sender
            .send_or_log(Event::LotCreated {
                lote_id: created.id,
                producto_id: created.producto_id,
                cantidad: created.cantidad_actual,
            })
            .await;
        info!(
            "Lot {} created for product {} with {} pieces",
            created.id, created.producto_id, created.cantidad_actual
        );
        Ok(created)
    }

    /// Replaces a lot's mutable fields wholesale. Does not recompute the
    /// active flag from the quantity; administrative callers own that.
    #[instrument(skip(self, fields))]
    pub async fn update_lot(&self, id: i32, fields: UpdateLot) -> Result<lote::Model, ServiceError> {
        let existing = self.get_lot(id).await?;

        let mut lot: lote::ActiveModel = existing.into();
        lot.lote = Set(fields.lote);
        lot.fecha_caducidad = Set(fields.fecha_caducidad);
        lot.cantidad_actual = Set(fields.cantidad_actual);
        lot.activo = Set(fields.activo);
        lot.updated_at = Set(Utc::now());

        let updated = lot.update(&*self.db).await?;
        Ok(updated)
    }

    /// Hard delete. Administrative operation only; the purchase, sale and
    /// consumption flows never remove lot rows.
    #[instrument(skip(self))]
    pub async fn delete_lot(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get_lot(id).await?;
        LoteEntity::delete_by_id(existing.id).exec(&*self.db).await?;
        info!("Lot {} deleted", id);
        Ok(())
    }

    /// Returns the next lot the FEFO policy would deplete for a product.
    #[instrument(skip(self))]
    pub async fn next_depletable_lot(
        &self,
        producto_id: i32,
    ) -> Result<Option<lote::Model>, ServiceError> {
        next_depletable_lot(&*self.db, producto_id).await
    }
}

/// The single most-FEFO-eligible lot: active, with stock, NULL expiration
/// sorting last, then ascending expiration, then ascending id as the
/// deterministic tie-break for same-day expirations.
///
/// Generic over the connection so the sale path can run it inside its
/// transaction against the same snapshot it mutates.
pub async fn next_depletable_lot<C: ConnectionTrait>(
    conn: &C,
    producto_id: i32,
) -> Result<Option<lote::Model>, ServiceError> {
    let lot = LoteEntity::find()
        .filter(lote::Column::ProductoId.eq(producto_id))
        .filter(lote::Column::Activo.eq(true))
        .filter(lote::Column::CantidadActual.gt(0))
        .order_by_with_nulls(lote::Column::FechaCaducidad, Order::Asc, NullOrdering::Last)
        .order_by_asc(lote::Column::Id)
        .one(conn)
        .await?;
    Ok(lot)
}

/// Aggregate sellable stock for a product: the sum of quantity remaining
/// across active lots with stock. The sale pre-flight and the FEFO loop
/// both read availability through this predicate so the two computations
/// cannot disagree within one serialized operation.
pub async fn available_stock<C: ConnectionTrait>(
    conn: &C,
    producto_id: i32,
) -> Result<i64, ServiceError> {
    let lots = LoteEntity::find()
        .filter(lote::Column::ProductoId.eq(producto_id))
        .filter(lote::Column::Activo.eq(true))
        .filter(lote::Column::CantidadActual.gt(0))
        .all(conn)
        .await?;
    Ok(lots.iter().map(|l| l.cantidad_actual as i64).sum())
}
