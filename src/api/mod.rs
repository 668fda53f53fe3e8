pub mod handlers;
pub mod state;
pub mod ws;

pub use handlers::*;
pub use state::AppState;

use axum::{
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// 构建路由
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .route("/api/entries", get(get_entries))
        .route("/api/clients", get(list_clients).post(create_client))
        .route("/api/clients/analytics", get(clients_analytics))
        .route("/api/clients/analytics.csv", get(clients_analytics_csv))
        .route("/api/clients/search", get(search_clients))
        .route("/api/clients/:client_id", get(get_client).delete(delete_client))
        .route("/ws", get(ws::ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
