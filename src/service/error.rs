use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Lead not found")]
    LeadNotFound(Uuid),

    // Absent and not-owned are reported identically on purpose: the caller
    // must not learn whether another agent's record exists.
    #[error("Property not found or not yours")]
    PropertyNotFound(Uuid),

    #[error("Cannot delete property. It is assigned to one or more leads.")]
    PropertyStillReferenced { property_id: Uuid, leads: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("SMS provider error: {0}")]
    Sms(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::LeadNotFound(_) | ServiceError::PropertyNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::PropertyStillReferenced { .. } => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            // A row that vanished between validation and the transaction is
            // still "not found or not yours" from the caller's side.
            ServiceError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            ServiceError::Database(_) | ServiceError::Sms(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let message = match &error {
            ServiceError::Database(sqlx::Error::RowNotFound) => {
                "Property not found or not yours".to_string()
            }
            _ => error.to_string(),
        };

        HttpError::new(message, error.status_code())
    }
}
