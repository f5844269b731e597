use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product catalog row. Owned by the external product CRUD; the
/// inventory core only ever reads it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = Producto)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
    pub categoria_id: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub precio_compra: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub precio_venta: rust_decimal::Decimal,
    pub codigo_barras: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lote::Entity")]
    Lotes,
}

impl Related<super::lote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
