use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::{
    entities::{
        lote,
        sale::{self, Entity as SaleEntity},
        sale_line::{self, ContainerType, Entity as SaleLineEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::lots,
};

#[derive(Debug, Clone)]
pub struct SaleLineInput {
    pub producto_id: i32,
    /// Quantity the customer was charged, in `tipo_contenedor` units.
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub tipo_contenedor: ContainerType,
    /// Defaults to 1; only meaningful for boxes and packages.
    pub unidades_por_contenedor: Option<i32>,
    /// Lot label / expiration copied onto the line for audit.
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
}

impl SaleLineInput {
    fn unidades(&self) -> i32 {
        self.unidades_por_contenedor.unwrap_or(1)
    }

    /// Physical pieces this line takes out of stock.
    fn piezas_requeridas(&self) -> i64 {
        self.cantidad as i64 * self.tipo_contenedor.piece_multiplier(self.unidades()) as i64
    }

    /// Line subtotal. Packages price per contained piece; boxes and single
    /// units price per charged quantity only. The asymmetry mirrors the
    /// store's historical ledger and is preserved on purpose.
    fn subtotal(&self) -> Decimal {
        if self.tipo_contenedor.prices_per_piece() {
            Decimal::from(self.cantidad) * Decimal::from(self.unidades()) * self.precio_unitario
        } else {
            Decimal::from(self.cantidad) * self.precio_unitario
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSale {
    /// Defaults to "now" when omitted.
    pub fecha: Option<DateTime<Utc>>,
    pub total: Decimal,
    pub observaciones: Option<String>,
    pub detalles: Vec<SaleLineInput>,
}

/// Records stock-out transactions: pre-flight stock verification, then a
/// single transaction inserting the sale, its lines, and the FEFO lot
/// depletions they cause.
#[derive(Clone)]
pub struct SaleService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    write_lock: Arc<Mutex<()>>,
}

impl SaleService {
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

    /// Creates a sale atomically, or rejects it wholesale.
    ///
    /// Any line whose required pieces exceed the product's aggregate
    /// active stock aborts the entire sale before anything is written.
    #[instrument(skip(self, request), fields(lines = request.detalles.len()))]
    pub async fn create_sale(&self, request: CreateSale) -> Result<sale::Model, ServiceError> {
        validate_sale(&request)?;

        // Serialize writes so the pre-flight promise still holds when the
        // depletion loop runs.
        let _guard = self.write_lock.lock().await;

        // Pre-flight: verify aggregate stock per line before opening the
        // write transaction. A shortfall means zero side effects.
        for detalle in &request.detalles {
            let required = detalle.piezas_requeridas();
            let available = lots::available_stock(&*self.db, detalle.producto_id).await?;
            if required > available {
                return Err(ServiceError::insufficient_stock(
                    detalle.producto_id,
                    required,
                    available,
                ));
            }
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let header = sale::ActiveModel {
            fecha: Set(request.fecha.unwrap_or(now)),
            total: Set(request.total),
            observaciones: Set(request.observaciones.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let header = header.insert(&txn).await?;

        let line_count = request.detalles.len();
        for detalle in request.detalles {
            let piezas = detalle.piezas_requeridas();
            let piezas_vendidas = i32::try_from(piezas).map_err(|_| {
                ServiceError::ValidationError(format!(
                    "line pieces {} exceed the supported maximum",
                    piezas
                ))
            })?;
            let line = sale_line::ActiveModel {
                venta_id: Set(header.id),
                producto_id: Set(detalle.producto_id),
                cantidad: Set(detalle.cantidad),
                precio_unitario: Set(detalle.precio_unitario),
                subtotal: Set(detalle.subtotal()),
                tipo_contenedor: Set(detalle.tipo_contenedor.to_string()),
                unidades_por_contenedor: Set(detalle.unidades()),
                piezas_vendidas: Set(piezas_vendidas),
                lote: Set(detalle.lote.clone()),
                fecha_caducidad: Set(detalle.fecha_caducidad),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            line.insert(&txn).await?;

            let depleted = deplete_fefo(&txn, detalle.producto_id, piezas).await?;
            if depleted < piezas {
                // Pre-flight promised enough stock but the loop ran dry.
                // Historical behavior is to commit the short depletion
                // silently; keep that, but make the divergence loud.
                warn!(
                    sale_id = header.id,
                    producto_id = detalle.producto_id,
                    requested = piezas,
                    depleted,
                    "FEFO depletion under-ran the pre-flight check"
                );
                self.event_sender
                    .send_or_log(Event::UnderDepletion {
                        sale_id: header.id,
                        producto_id: detalle.producto_id,
                        requested: piezas,
                        depleted,
                    })
                    .await;
            }
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::SaleRecorded {
                sale_id: header.id,
                line_count,
            })
            .await;
        info!("Sale {} recorded with {} line items", header.id, line_count);
        Ok(header)
    }

    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<sale::Model>, ServiceError> {
        let sales = SaleEntity::find()
            .order_by_desc(sale::Column::Fecha)
            .all(&*self.db)
            .await?;
        Ok(sales)
    }

    /// Fetches a sale header with its line items.
    #[instrument(skip(self))]
    pub async fn get_sale(
        &self,
        id: i32,
    ) -> Result<(sale::Model, Vec<sale_line::Model>), ServiceError> {
        let header = SaleEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale {} not found", id)))?;

        let lines = SaleLineEntity::find()
            .filter(sale_line::Column::VentaId.eq(id))
            .order_by_asc(sale_line::Column::Id)
            .all(&*self.db)
            .await?;

        Ok((header, lines))
    }
}

/// Depletes up to `requested` pieces from a product's lots in FEFO order,
/// deactivating any lot drained to zero so `cantidad_actual <= 0` never
/// coexists with `activo = true`. Returns the pieces actually depleted;
/// running out of eligible lots stops the loop without erroring.
pub(crate) async fn deplete_fefo<C: ConnectionTrait>(
    conn: &C,
    producto_id: i32,
    requested: i64,
) -> Result<i64, ServiceError> {
    let mut remaining = requested;

    while remaining > 0 {
        let Some(lot) = lots::next_depletable_lot(conn, producto_id).await? else {
            break;
        };

        let take = (lot.cantidad_actual as i64).min(remaining);
        let new_qty = lot.cantidad_actual - take as i32;
        let drained = new_qty <= 0;

        let mut update: lote::ActiveModel = lot.clone().into();
        update.cantidad_actual = Set(new_qty);
        if drained {
            update.activo = Set(false);
        }
        update.updated_at = Set(Utc::now());
        update.update(conn).await?;

        if drained {
            info!("Lot {} drained and deactivated", lot.id);
        }
        remaining -= take;
    }

    Ok(requested - remaining)
}

fn validate_sale(request: &CreateSale) -> Result<(), ServiceError> {
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
        if let Some(unidades) = detalle.unidades_por_contenedor {
            if unidades <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "line {}: units per container must be positive, got {}",
                    idx, unidades
                )));
            }
        }
        if detalle.piezas_requeridas() > i32::MAX as i64 {
            return Err(ServiceError::ValidationError(format!(
                "line {}: piece count exceeds the supported maximum",
                idx
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(tipo: ContainerType, cantidad: i32, unidades: Option<i32>) -> SaleLineInput {
        SaleLineInput {
            producto_id: 1,
            cantidad,
            precio_unitario: dec!(10),
            tipo_contenedor: tipo,
            unidades_por_contenedor: unidades,
            lote: None,
            fecha_caducidad: None,
        }
    }

    #[test]
    fn package_subtotal_multiplies_by_contained_units() {
        let l = line(ContainerType::Paquete, 2, Some(6));
        assert_eq!(l.piezas_requeridas(), 12);
        assert_eq!(l.subtotal(), dec!(120));
    }

    #[test]
    fn box_subtotal_ignores_contained_units() {
        let l = line(ContainerType::Caja, 2, Some(6));
        assert_eq!(l.piezas_requeridas(), 12);
        assert_eq!(l.subtotal(), dec!(20));
    }

    #[test]
    fn single_units_convert_one_to_one() {
        let l = line(ContainerType::Unidad, 4, None);
        assert_eq!(l.piezas_requeridas(), 4);
        assert_eq!(l.subtotal(), dec!(40));
    }

    #[test]
    fn zero_quantity_lines_are_rejected() {
        let request = CreateSale {
            fecha: None,
            total: dec!(0),
            observaciones: None,
            detalles: vec![line(ContainerType::Unidad, 0, None)],
        };
        assert!(matches!(
            validate_sale(&request),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn overflowing_piece_counts_are_rejected() {
        let request = CreateSale {
            fecha: None,
            total: dec!(0),
            observaciones: None,
            detalles: vec![line(ContainerType::Caja, i32::MAX, Some(i32::MAX))],
        };
        assert!(matches!(
            validate_sale(&request),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn depletion_stops_short_when_lots_run_dry() {
        let db = crate::db::establish_connection("sqlite::memory:")
            .await
            .unwrap();
        crate::db::run_migrations(&db).await.unwrap();

        let now = Utc::now();
        let lot = lote::ActiveModel {
            producto_id: Set(1),
            detalle_compra_id: Set(None),
            lote: Set(None),
            fecha_caducidad: Set(None),
            cantidad_actual: Set(4),
            activo: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        // Asking for more than exists drains what is there and reports the
        // shortfall instead of erroring.
        let depleted = deplete_fefo(&db, 1, 10).await.unwrap();
        assert_eq!(depleted, 4);

        let lot = lote::Entity::find_by_id(lot.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lot.cantidad_actual, 0);
        assert!(!lot.activo, "a drained lot must be deactivated");
    }
}
