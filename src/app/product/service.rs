//! 产品业务服务

use std::sync::Arc;

use tracing::{info, warn};

use super::model::{CreateProductRequest, NewProduct, Product, UpdateProductRequest};
use super::store::ProductStore;
use crate::core::error::AppError;

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.store.list().await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        match self.store.find(id).await? {
            Some(product) => Ok(product),
            None => {
                warn!("Product {} not found", id);
                Err(AppError::product_not_found())
            }
        }
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product, AppError> {
        let new_product = request.into_new_product()?;
        self.insert(new_product).await
    }

    /// 直接写入已校验数据（用于数据填充）
    pub async fn insert(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let product = self.store.insert(new_product).await?;
        info!("Created product: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: i64,
        request: UpdateProductRequest,
    ) -> Result<Product, AppError> {
        let changes = request.into_changes()?;
        match self.store.update(id, changes).await? {
            Some(product) => {
                info!("Updated product: {} ({})", product.name, product.id);
                Ok(product)
            }
            None => {
                warn!("Product {} not found for update", id);
                Err(AppError::product_not_found())
            }
        }
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        if self.store.delete(id).await? {
            info!("Deleted product: {}", id);
            Ok(())
        } else {
            warn!("Product {} not found for delete", id);
            Err(AppError::product_not_found())
        }
    }
}

/// 不是正整数的 id 一律视为不存在
pub fn parse_product_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(AppError::product_not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::store::MemoryProductStore;

    fn service() -> ProductService {
        ProductService::new(Arc::new(MemoryProductStore::new()))
    }

    #[test]
    fn ids_that_cannot_resolve_are_not_found() {
        assert_eq!(parse_product_id("17").unwrap(), 17);
        for raw in ["abc", "0", "-3", "1.5", ""] {
            assert!(matches!(parse_product_id(raw), Err(AppError::NotFound(_))));
        }
    }

    #[tokio::test]
    async fn invalid_create_does_not_touch_the_store() {
        let service = service();
        let request = CreateProductRequest {
            name: Some(String::new()),
            price: Some(-1.0),
            ..Default::default()
        };
        let err = service.create_product(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref f) if f.contains("name") && f.contains("price")));
        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_update_leaves_row_unchanged() {
        let service = service();
        let created = service
            .create_product(CreateProductRequest {
                name: Some("Desk".to_string()),
                price: Some(250.0),
                stock: Some(4),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = service
            .update_product(
                created.id,
                UpdateProductRequest {
                    name: Some("Standing desk".to_string()),
                    stock: Some(-2),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.get_product(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let service = service();
        let created = service
            .create_product(CreateProductRequest {
                name: Some("Chair".to_string()),
                price: Some(80.0),
                ..Default::default()
            })
            .await
            .unwrap();

        service.delete_product(created.id).await.unwrap();
        assert!(matches!(
            service.delete_product(created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_product(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
