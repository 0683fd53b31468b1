use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler, leads::leads_handler, properties::properties_handler,
        sms::sms_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "sms": app_state.sms_service.mode()
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest(
            "/leads",
            leads_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/properties",
            properties_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/sms", sms_handler())
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new().nest("/api", api_route)
}
