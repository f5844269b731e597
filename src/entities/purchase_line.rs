use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase line item. `lote` and `fecha_caducidad` are carried into the
/// lot this line mints.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = DetalleCompra)]
#[sea_orm(table_name = "detail_compras")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub compra_id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub precio_unitario: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub subtotal: rust_decimal::Decimal,
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::CompraId",
        to = "super::purchase::Column::Id"
    )]
    Purchase,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductoId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(has_many = "super::lote::Entity")]
    Lotes,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::lote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
