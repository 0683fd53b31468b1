use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::propertydtos::{CreatePropertyDto, UpdatePropertyDto},
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn properties_handler() -> Router {
    Router::new()
        .route("/", post(create_property).get(list_properties))
        .route("/available", get(list_properties_for_assignment))
        .route("/:property_id", put(update_property).delete(delete_property))
}

pub async fn create_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property = app_state
        .assignment_service
        .create_property(agent.agent.id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": {
                "property": property
            }
        })),
    ))
}

pub async fn list_properties(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let properties = app_state
        .assignment_service
        .list_properties(agent.agent.id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": properties.len(),
        "data": {
            "properties": properties
        }
    })))
}

/// Feed for the lead form: every property with its current status, taken
/// ones first so the agent can see what is off the table.
pub async fn list_properties_for_assignment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let properties = app_state
        .assignment_service
        .list_properties_for_assignment(agent.agent.id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": properties.len(),
        "data": {
            "properties": properties
        }
    })))
}

pub async fn update_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
    Path(property_id): Path<Uuid>,
    Json(body): Json<UpdatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .assignment_service
        .update_property(property_id, agent.agent.id, body)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "property": property
        }
    })))
}

pub async fn delete_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .assignment_service
        .delete_property(property_id, agent.agent.id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property deleted successfully"
    })))
}
