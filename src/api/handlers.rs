use crate::api::AppState;
use crate::error::AppError;
use crate::models::{ClientAnalytics, RegisteredClient};
use crate::service::{analytics_response, export::clients_to_csv, ClientRegistry};
use axum::{
    extract::{Json, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: &'static str,
    pub store: &'static str,
    pub connections: usize,
}

/// 客户列表响应
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<RegisteredClient>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// 创建客户 (查询参数)
#[derive(Debug, Deserialize)]
pub struct CreateClientParams {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
}

fn registry(state: &AppState) -> Result<&Arc<ClientRegistry>, AppError> {
    state
        .registry
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Clients service unavailable".to_string()))
}

pub async fn root() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "Salary Ledger API" }))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = state.ledger.store_healthy().await;
    Json(HealthResponse {
        status: if store_ok { "healthy" } else { "degraded" },
        cache: "ok",
        store: if store_ok { "ok" } else { "error" },
        connections: state.ledger.hub().len(),
    })
}

pub async fn get_entries(State(state): State<AppState>) -> Json<Value> {
    match state.ledger.snapshot().await {
        Some(snapshot) => Json(json!({ "data": snapshot })),
        None => Json(json!({ "data": {} })),
    }
}

/// 客户分析, 始终 200, 失败写在 error 字段
pub async fn clients_analytics(State(state): State<AppState>) -> Json<ClientAnalytics> {
    let payload = state.ledger.cached_payload().await;
    Json(analytics_response(payload.as_deref()))
}

pub async fn clients_analytics_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let payload = state.ledger.cached_payload().await;
    let analytics = analytics_response(payload.as_deref());
    if let Some(error) = analytics.error {
        return Err(AppError::Internal(error));
    }

    let body = clients_to_csv(&analytics)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"clients.csv\""),
        ],
        body,
    )
        .into_response())
}

pub async fn list_clients(State(state): State<AppState>) -> Json<ClientsResponse> {
    let clients = match &state.registry {
        Some(registry) => registry.all().await,
        None => Vec::new(),
    };
    Json(ClientsResponse { clients })
}

pub async fn search_clients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<ClientsResponse> {
    let clients = match &state.registry {
        Some(registry) if params.q.is_empty() => registry.all().await,
        Some(registry) => registry.search(&params.q).await,
        None => Vec::new(),
    };
    Json(ClientsResponse { clients })
}

pub async fn create_client(
    State(state): State<AppState>,
    Query(params): Query<CreateClientParams>,
) -> Result<Json<Value>, AppError> {
    let client = registry(&state)?
        .add_or_update(&params.name, &params.phone, &params.email, &params.notes)
        .await?;
    Ok(Json(json!({ "success": true, "client": client })))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let client = registry(&state)?
        .get(&client_id)
        .await
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
    Ok(Json(json!({ "client": client })))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !registry(&state)?.delete(&client_id).await? {
        return Err(AppError::NotFound("Client not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}
