use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    entities::{
        lote::{self, Entity as LoteEntity},
        product::{self, Entity as ProductEntity},
    },
    errors::ServiceError,
};

/// One product's active lots, rolled up for inventory views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryGroup {
    pub product: product::Model,
    pub lotes: Vec<lote::Model>,
    pub lot_count: usize,
    pub total_pieces: i64,
}

/// Read-only rollup of the lot ledger, grouped by product. The low-stock
/// endpoint uses the same grouping so both surfaces agree on what an
/// "active lot" is.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Groups active lots by product with per-product lot count and total
    /// remaining pieces. Pure read: one fetch of products, one of lots.
    #[instrument(skip(self))]
    pub async fn grouped_inventory(&self) -> Result<Vec<InventoryGroup>, ServiceError> {
        let products = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?;
        let lots = LoteEntity::find().all(&*self.db).await?;

        let groups = products
            .into_iter()
            .map(|p| {
                let active: Vec<lote::Model> = lots
                    .iter()
                    .filter(|l| l.producto_id == p.id && l.activo)
                    .cloned()
                    .collect();
                let total_pieces = active.iter().map(|l| l.cantidad_actual as i64).sum();
                InventoryGroup {
                    lot_count: active.len(),
                    total_pieces,
                    lotes: active,
                    product: p,
                }
            })
            .collect();

        Ok(groups)
    }

    /// Products whose total active stock is at or below `threshold`,
    /// limited to active products. Used by the dashboard's reorder alert.
    #[instrument(skip(self))]
    pub async fn low_stock(&self, threshold: i64) -> Result<Vec<InventoryGroup>, ServiceError> {
        let groups = self.grouped_inventory().await?;
        Ok(groups
            .into_iter()
            .filter(|g| g.product.activo && g.total_pieces <= threshold)
            .collect())
    }

    /// All lots a product currently has, active or not. Backing query for
    /// the per-product detail view.
    #[instrument(skip(self))]
    pub async fn lots_for_product(&self, producto_id: i32) -> Result<Vec<lote::Model>, ServiceError> {
        let lots = LoteEntity::find()
            .filter(lote::Column::ProductoId.eq(producto_id))
            .order_by_asc(lote::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(lots)
    }
}
