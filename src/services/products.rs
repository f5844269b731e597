use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;
use tracing::instrument;

use crate::{
    entities::product::{self, Entity as ProductEntity},
    errors::ServiceError,
};

/// Read surface over the product catalog. The catalog itself is owned by
/// the external product CRUD; the inventory core never mutates it.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<product::Model>, ServiceError> {
        let products = ProductEntity::find()
            .order_by_asc(product::Column::Nombre)
            .all(&*self.db)
            .await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> Result<product::Model, ServiceError> {
        ProductEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }
}
