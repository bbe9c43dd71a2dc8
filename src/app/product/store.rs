//! 产品存储抽象与内存实现

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::model::{NewProduct, Product, ProductChanges};
use crate::core::error::AppError;

/// 产品持久化接口
///
/// 每个方法对其操作的单行都是原子的
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 健康检查中显示的后端名称
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), AppError>;

    /// 按 id 升序返回全部产品
    async fn list(&self) -> Result<Vec<Product>, AppError>;

    async fn find(&self, id: i64) -> Result<Option<Product>, AppError>;

    async fn insert(&self, product: NewProduct) -> Result<Product, AppError>;

    /// 不存在该 id 时返回 `None`
    async fn update(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>, AppError>;

    /// 返回是否删除了一行
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    rows: BTreeMap<i64, Product>,
}

/// 内存存储，用于本地演示和测试
#[derive(Default)]
pub struct MemoryProductStore {
    state: RwLock<MemoryState>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, AppError> {
        let state = self.state.read().await;
        Ok(state.rows.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, AppError> {
        let state = self.state.read().await;
        Ok(state.rows.get(&id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let now = Utc::now();
        let product = Product {
            id: state.next_id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> Result<Option<Product>, AppError> {
        let mut state = self.state.write().await;
        let Some(product) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        if !changes.is_empty() {
            changes.apply_to(product);
            product.updated_at = Utc::now();
        }
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        Ok(state.rows.remove(&id).is_some())
    }
}
