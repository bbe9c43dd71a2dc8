//! # 产品目录服务
//!
//! 基于 Axum + SQLx 的产品 CRUD 服务：
//! - `app`：路由、处理器、业务服务、存储
//! - `core`：错误、响应、中间件、提取器
//! - `infrastructure`：数据库连接池与日志
//! - `config`：TOML 配置与环境变量覆盖

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{router, AppState};
pub use config::{Config, ConfigError, StoreBackend};
pub use crate::core::error::{AppError, FieldErrors};
