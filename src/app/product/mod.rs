//! 产品模块：模型、存储、服务、处理器与页面

pub mod factory;
pub mod handler;
pub mod model;
pub mod pg_store;
pub mod service;
pub mod store;
pub mod view;

pub use factory::ProductFactory;
pub use model::{NewProduct, Product, ProductChanges};
pub use pg_store::PgProductStore;
pub use service::ProductService;
pub use store::{MemoryProductStore, ProductStore};
