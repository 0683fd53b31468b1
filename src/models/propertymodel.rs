use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "property_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
    Booked,
    Sold,
}

impl PropertyStatus {
    pub fn to_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Booked => "booked",
            PropertyStatus::Sold => "sold",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Property {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub address: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub price: Option<BigDecimal>,
    pub property_type: Option<String>,
    pub status: PropertyStatus,
    pub created_at: Option<DateTime<Utc>>,
}
