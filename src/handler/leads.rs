use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        leaddtos::{CreateLeadDto, LeadDetailDto, UpdateLeadDto},
        propertydtos::PropertySummaryDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

pub fn leads_handler() -> Router {
    Router::new()
        .route("/", post(create_lead).get(list_leads))
        .route(
            "/:lead_id",
            get(get_lead).put(update_lead).delete(delete_lead),
        )
        .route("/:lead_id/send-reminder", post(send_reminder))
}

pub async fn create_lead(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateLeadDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let lead = app_state
        .assignment_service
        .create_lead(agent.agent.id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": {
                "lead": lead
            }
        })),
    ))
}

pub async fn list_leads(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let leads = app_state.assignment_service.list_leads(agent.agent.id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": leads.len(),
        "data": {
            "leads": leads
        }
    })))
}

pub async fn get_lead(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
    Path(lead_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (lead, property) = app_state
        .assignment_service
        .get_lead(lead_id, agent.agent.id)
        .await?;

    let detail = LeadDetailDto {
        lead,
        property: property.as_ref().map(PropertySummaryDto::from_property),
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "lead": detail
        }
    })))
}

pub async fn update_lead(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
    Path(lead_id): Path<Uuid>,
    Json(body): Json<UpdateLeadDto>,
) -> Result<impl IntoResponse, HttpError> {
    let lead = app_state
        .assignment_service
        .update_lead(lead_id, agent.agent.id, body)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "lead": lead
        }
    })))
}

pub async fn delete_lead(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
    Path(lead_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .assignment_service
        .delete_lead(lead_id, agent.agent.id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Lead deleted successfully"
    })))
}

pub async fn send_reminder(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(agent): Extension<JWTAuthMiddleware>,
    Path(lead_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (lead, _) = app_state
        .assignment_service
        .get_lead(lead_id, agent.agent.id)
        .await?;

    let agent_report = app_state
        .sms_service
        .send_agent_reminder(&agent.agent, &lead)
        .await?;
    let client_report = app_state
        .sms_service
        .send_client_followup(&agent.agent, &lead)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "provider": app_state.sms_service.mode(),
        "data": {
            "reports": [agent_report, client_report]
        }
    })))
}
