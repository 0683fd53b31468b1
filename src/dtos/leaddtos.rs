use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{dtos::propertydtos::PropertySummaryDto, models::leadmodel::Lead};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateLeadDto {
    #[validate(length(min = 1, message = "Client name is required"))]
    pub client_name: String,

    #[validate(length(min = 1, message = "Client phone is required"))]
    pub client_phone: String,

    pub property_interest: Option<String>,
    pub property_id: Option<Uuid>,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Distinguishes a field that was absent from one explicitly set to null,
/// so `property_id: null` clears the assignment while an omitted
/// `property_id` leaves it untouched.
fn explicit_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateLeadDto {
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub property_interest: Option<String>,

    /// `None` = not supplied, `Some(None)` = clear, `Some(Some(id))` = assign.
    #[serde(default, deserialize_with = "explicit_option")]
    pub property_id: Option<Option<Uuid>>,

    pub status: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeadDetailDto {
    #[serde(flatten)]
    pub lead: Lead,
    pub property: Option<PropertySummaryDto>,
}
