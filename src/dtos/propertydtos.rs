use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::propertymodel::{Property, PropertyStatus};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreatePropertyDto {
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub price: Option<BigDecimal>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
}

/// Mirrors the edit form: when only `status` is supplied the update is a
/// direct status overwrite (the escape hatch that skips lead-consistency
/// checks); otherwise it is a full detail edit that never touches status.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdatePropertyDto {
    pub address: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub price: Option<BigDecimal>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub status: Option<PropertyStatus>,
}

impl UpdatePropertyDto {
    pub fn is_status_only(&self) -> bool {
        self.status.is_some() && self.address.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PropertySummaryDto {
    pub id: Uuid,
    pub address: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub price: Option<BigDecimal>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub status: PropertyStatus,
}

impl PropertySummaryDto {
    pub fn from_property(property: &Property) -> Self {
        PropertySummaryDto {
            id: property.id,
            address: property.address.to_owned(),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            price: property.price.clone(),
            property_type: property.property_type.clone(),
            status: property.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn price_accepts_fractional_amounts() {
        let body: CreatePropertyDto =
            serde_json::from_str(r#"{"address":"12 Rose St","price":45000.50}"#).unwrap();
        assert_eq!(body.price, Some(BigDecimal::from_str("45000.5").unwrap()));

        let whole: CreatePropertyDto =
            serde_json::from_str(r#"{"address":"12 Rose St","price":45000000}"#).unwrap();
        assert_eq!(whole.price, Some(BigDecimal::from(45_000_000)));
    }

    #[test]
    fn status_only_payload_is_the_escape_hatch() {
        let status_only: UpdatePropertyDto =
            serde_json::from_str(r#"{"status":"sold"}"#).unwrap();
        assert!(status_only.is_status_only());

        let detail_edit: UpdatePropertyDto =
            serde_json::from_str(r#"{"address":"14 Rose St","price":50000.25}"#).unwrap();
        assert!(!detail_edit.is_status_only());
    }
}
