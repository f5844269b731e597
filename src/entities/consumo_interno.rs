use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Internal-use / shrinkage event against a single lot. Append-only:
/// never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = ConsumoInterno)]
#[sea_orm(table_name = "consumos_internos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lote_id: i32,
    pub cantidad: i32,
    pub motivo: Option<String>,
    pub fecha: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lote::Entity",
        from = "Column::LoteId",
        to = "super::lote::Column::Id"
    )]
    Lote,
}

impl Related<super::lote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
