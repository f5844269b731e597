use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Sale line item. `cantidad` is the quantity the customer was charged
/// for; `piezas_vendidas` is the physical piece count after container
/// conversion, recorded for audit.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = DetalleVenta)]
#[sea_orm(table_name = "detail_ventas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub venta_id: i32,
    pub producto_id: i32,
    pub cantidad: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub precio_unitario: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub subtotal: rust_decimal::Decimal,
    pub tipo_contenedor: String,
    pub unidades_por_contenedor: i32,
    pub piezas_vendidas: i32,
    /// Lot label / expiration copied at sale time for audit only.
    pub lote: Option<String>,
    pub fecha_caducidad: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sale::Entity",
        from = "Column::VentaId",
        to = "super::sale::Column::Id"
    )]
    Sale,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductoId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Container the customer was charged by.
///
/// Pricing quirk inherited from the store's ledger: `Paquete` multiplies
/// the subtotal by units-per-container, `Caja` does not, even though both
/// convert to the same physical piece count. Kept as-is pending a ruling
/// from the store owner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContainerType {
    /// A single sellable piece.
    Unidad,
    /// A box of `unidades_por_contenedor` pieces, priced per box.
    Caja,
    /// A package of `unidades_por_contenedor` pieces, priced per piece.
    Paquete,
}

impl ContainerType {
    /// Physical pieces represented by one charged unit of this container.
    pub fn piece_multiplier(self, unidades_por_contenedor: i32) -> i32 {
        match self {
            ContainerType::Unidad => 1,
            ContainerType::Caja | ContainerType::Paquete => unidades_por_contenedor,
        }
    }

    /// Whether the subtotal multiplies by units-per-container.
    pub fn prices_per_piece(self) -> bool {
        matches!(self, ContainerType::Paquete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_type_round_trips_through_strings() {
        for (tag, parsed) in [
            ("unidad", ContainerType::Unidad),
            ("caja", ContainerType::Caja),
            ("paquete", ContainerType::Paquete),
        ] {
            assert_eq!(tag.parse::<ContainerType>().unwrap(), parsed);
            assert_eq!(parsed.to_string(), tag);
        }
    }

    #[test]
    fn piece_multiplier_ignores_units_for_single_units() {
        assert_eq!(ContainerType::Unidad.piece_multiplier(6), 1);
        assert_eq!(ContainerType::Caja.piece_multiplier(6), 6);
        assert_eq!(ContainerType::Paquete.piece_multiplier(6), 6);
    }
}
