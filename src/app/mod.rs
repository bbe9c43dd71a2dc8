//! 应用层：路由与共享状态

pub mod product;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::{error::AppError, middleware::request_logging_middleware};
use product::{handler, view, ProductService, ProductStore};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            product_service: ProductService::new(store),
        }
    }
}

/// 创建路由
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(view::product_list_page))
        .route("/products", get(view::product_list_page))
        .route("/health", get(health_check))
        .route(
            "/api/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route(
            "/api/products/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .patch(handler::update_product)
                .delete(handler::delete_product),
        )
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// 健康检查
async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.product_service.ping().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "store": state.product_service.backend(),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
