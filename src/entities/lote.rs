use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One batch of physical stock for a product.
///
/// `cantidad_actual` is the remaining piece count; a lot drained to zero
/// (or below, by a permissive consumption) must carry `activo = false`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = Lote)]
#[sea_orm(table_name = "lotes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub producto_id: i32,
    /// Purchase line that minted this lot, if it came from a purchase.
    pub detalle_compra_id: Option<i32>,
    /// Human-readable batch label.
    pub lote: Option<String>,
    /// NULL means "never expires" and sorts after every dated lot in FEFO.
    pub fecha_caducidad: Option<NaiveDate>,
    pub cantidad_actual: i32,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductoId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::purchase_line::Entity",
        from = "Column::DetalleCompraId",
        to = "super::purchase_line::Column::Id"
    )]
    PurchaseLine,
    #[sea_orm(has_many = "super::consumo_interno::Entity")]
    ConsumosInternos,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::purchase_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseLine.def()
    }
}

impl Related<super::consumo_interno::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConsumosInternos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
