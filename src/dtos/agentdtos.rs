use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::agentmodel::Agent;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterAgentDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginAgentDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterAgentDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterAgentDto {
    pub fn filter_agent(agent: &Agent) -> Self {
        FilterAgentDto {
            id: agent.id.to_string(),
            name: agent.name.to_owned(),
            email: agent.email.to_owned(),
            phone: agent.phone.to_owned(),
            created_at: agent.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentData {
    pub agent: FilterAgentDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentResponseDto {
    pub status: String,
    pub data: AgentData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentLoginResponseDto {
    pub status: String,
    pub agent: FilterAgentDto,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}
