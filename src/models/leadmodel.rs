use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// UI-exposed lead statuses. The column itself is free-form text so the
/// service never rejects other values, but new leads always start as `new`.
pub const LEAD_STATUS_NEW: &str = "new";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Lead {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub property_id: Option<Uuid>,
    pub client_name: String,
    pub client_phone: String,
    pub property_interest: Option<String>,
    pub status: String,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
