use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 账本存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid date {0:?}, expected DD.MM.YYYY")]
    InvalidDate(String),

    #[error("row {0} not found")]
    RowNotFound(i64),

    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 客户分析错误 (只在公共入口产生, 以 error 字段返回)
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),
}

/// 客户登记簿持久化错误
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP 层错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Internal(format!("CSV export failed: {}", e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
