//! 产品 HTTP 处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use super::{
    model::{CreateProductRequest, Product, UpdateProductRequest},
    service::parse_product_id,
};
use crate::app::AppState;
use crate::core::{error::AppError, extract::JsonBody, response::ApiResponse};

#[derive(Debug, Serialize)]
pub struct DeletedProduct {
    pub id: i64,
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = state.product_service.list_products().await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    let product = state.product_service.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let id = parse_product_id(&id)?;
    let product = state.product_service.get_product(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    // 先校验请求体，再确认资源存在
    let product = match parse_product_id(&id) {
        Ok(id) => state.product_service.update_product(id, payload).await?,
        Err(not_found) => {
            payload.into_changes()?;
            return Err(not_found);
        }
    };
    Ok(Json(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedProduct>>, AppError> {
    let id = parse_product_id(&id)?;
    state.product_service.delete_product(id).await?;
    Ok(Json(
        ApiResponse::success(DeletedProduct { id }).with_message("Product deleted"),
    ))
}
