use axum::{response::IntoResponse, routing::post, Json, Router};
use serde_json::Value;
use tracing::{info, warn};

/// Provider webhooks. Unauthenticated, and always 200 so the provider does
/// not retry forever.
pub fn sms_handler() -> Router {
    Router::new()
        .route("/delivery", post(delivery_report))
        .route("/inbox", post(inbound_message))
}

pub async fn delivery_report(Json(payload): Json<Value>) -> impl IntoResponse {
    let id = payload.get("id").and_then(Value::as_str).unwrap_or("unknown");
    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    info!(id, status, "sms delivery report received");

    Json(serde_json::json!({ "status": "success" }))
}

pub async fn inbound_message(Json(payload): Json<Value>) -> impl IntoResponse {
    let from = payload.get("from").and_then(Value::as_str).unwrap_or("unknown");
    let text = payload.get("text").and_then(Value::as_str).unwrap_or("");

    if is_opt_out(text) {
        warn!(from, "client opted out of sms");
    } else {
        info!(from, text, "inbound sms received");
    }

    Json(serde_json::json!({ "status": "success" }))
}

/// Opt-out if the message contains STOP anywhere, any casing, so replies
/// like "please stop" or "STOP texting me" are honored too.
fn is_opt_out(text: &str) -> bool {
    text.to_uppercase().contains("STOP")
}
