//! 核心错误处理模块

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// 字段级校验错误，按字段名聚合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// 用 `other` 中的消息替换同名字段的消息
    pub fn overlay(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// 没有错误时返回 `Ok`
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, kind) in errors.errors() {
            // 只有扁平结构，嵌套结构和列表不会出现在请求体中
            if let ValidationErrorsKind::Field(list) = kind {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid ({}).", field, err.code));
                    fields.add(field.to_string(), message);
                }
            }
        }
        fields
    }
}

/// 应用错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("malformed request body: {message}")]
    MalformedBody { status: StatusCode, message: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

}

impl AppError {
    pub fn product_not_found() -> Self {
        AppError::NotFound("Product not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MalformedBody { status, .. } => *status,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, user_message, errors) = match self {
            AppError::Validation(errors) => (
                "VALIDATION_FAILED",
                "The given data was invalid.".to_string(),
                Some(errors),
            ),
            AppError::NotFound(msg) => ("NOT_FOUND", msg, None),
            AppError::MalformedBody { message, .. } => ("MALFORMED_BODY", message, None),
            AppError::Database(e) => {
                error!("Database error: {}", e);
                ("INTERNAL_SERVER_ERROR", "Database error".to_string(), None)
            }
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message: user_message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            errors,
        };

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("name", "The name field is required.");
        errors.add("price", "The price field must be at least 0.");
        errors.add("price", "The price field must be a number.");

        assert!(errors.contains("name"));
        assert_eq!(errors.get("price").map(|m| m.len()), Some(2));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "price"]);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn overlay_replaces_messages_of_the_same_field() {
        let mut errors = FieldErrors::new();
        errors.add("name", "The name field is required.");
        errors.add("price", "The price field must be at least 0.");

        let mut type_errors = FieldErrors::new();
        type_errors.add("name", "The name field must be a string.");
        errors.overlay(type_errors);

        assert_eq!(
            errors.get("name"),
            Some(&["The name field must be a string.".to_string()][..])
        );
        assert!(errors.contains("price"));
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AppError::product_not_found().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation(FieldErrors::new()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
