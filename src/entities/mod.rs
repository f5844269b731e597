//! SeaORM entities for the store's persisted state.
//!
//! One typed entity per table; all queries map rows at this boundary
//! instead of trusting ad-hoc row shapes.

pub mod consumo_interno;
pub mod lote;
pub mod product;
pub mod purchase;
pub mod purchase_line;
pub mod sale;
pub mod sale_line;

pub use consumo_interno::Entity as ConsumoInterno;
pub use lote::Entity as Lote;
pub use product::Entity as Product;
pub use purchase::Entity as Purchase;
pub use purchase_line::Entity as PurchaseLine;
pub use sale::Entity as Sale;
pub use sale_line::Entity as SaleLine;
