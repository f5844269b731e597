pub mod consumption;
pub mod inventory;
pub mod lots;
pub mod products;
pub mod purchases;
pub mod sales;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub lots: Arc<crate::services::lots::LotService>,
    pub purchases: Arc<crate::services::purchases::PurchaseService>,
    pub sales: Arc<crate::services::sales::SaleService>,
    pub consumption: Arc<crate::services::consumption::ConsumptionService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub products: Arc<crate::services::products::ProductService>,
}

impl AppServices {
    /// Builds the service container. All three write services share one
    /// write lock so purchase/sale/consumption mutations stay serialized
    /// even under a concurrent HTTP runtime.
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        let write_lock = Arc::new(Mutex::new(()));

        Self {
            lots: Arc::new(crate::services::lots::LotService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            purchases: Arc::new(crate::services::purchases::PurchaseService::new(
                db_pool.clone(),
                event_sender.clone(),
                write_lock.clone(),
            )),
            sales: Arc::new(crate::services::sales::SaleService::new(
                db_pool.clone(),
                event_sender.clone(),
                write_lock.clone(),
            )),
            consumption: Arc::new(crate::services::consumption::ConsumptionService::new(
                db_pool.clone(),
                event_sender,
                write_lock,
            )),
            inventory: Arc::new(crate::services::inventory::InventoryService::new(
                db_pool.clone(),
            )),
            products: Arc::new(crate::services::products::ProductService::new(db_pool)),
        }
    }
}
