//! Boundary schema for the two document collections.
//!
//! Insert bodies are fully-required records; PUT bodies are patches where
//! every field is optional and absent fields are left untouched by the store
//! (merge-patch). Wire names are camelCase, matching the frontend contract.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid request body")]
pub struct ValidationError {
    pub field_errors: HashMap<String, String>,
}

/// Identity object the client submits at login; embedded into the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_name: String,
    pub price: f64,
    pub service_provider_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub service_name: String,
    pub price: f64,
    pub user_email: String,
    pub service_provider_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Collects per-field failures and turns them into a ValidationError.
#[derive(Debug, Default)]
struct FieldCheck {
    errors: HashMap<String, String>,
}

impl FieldCheck {
    fn require_non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.errors
                .insert(field.to_string(), "must not be empty".to_string());
        }
    }

    fn require_email(&mut self, field: &str, value: &str) {
        if !value.contains('@') || value.trim().is_empty() {
            self.errors
                .insert(field.to_string(), "must be an email address".to_string());
        }
    }

    fn require_price(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.errors.insert(
                field.to_string(),
                "must be a non-negative number".to_string(),
            );
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                field_errors: self.errors,
            })
        }
    }
}

impl Identity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::default();
        check.require_email("email", &self.email);
        check.finish()
    }
}

impl Service {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::default();
        check.require_non_empty("serviceName", &self.service_name);
        check.require_email("serviceProviderEmail", &self.service_provider_email);
        check.require_price("price", self.price);
        check.finish()
    }
}

impl ServicePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::default();
        if let Some(name) = &self.service_name {
            check.require_non_empty("serviceName", name);
        }
        if let Some(email) = &self.service_provider_email {
            check.require_email("serviceProviderEmail", email);
        }
        if let Some(price) = self.price {
            check.require_price("price", price);
        }
        check.finish()
    }
}

impl Booking {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::default();
        check.require_non_empty("serviceName", &self.service_name);
        check.require_email("userEmail", &self.user_email);
        check.require_email("serviceProviderEmail", &self.service_provider_email);
        check.require_price("price", self.price);
        check.finish()
    }
}

impl BookingPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::default();
        if let Some(name) = &self.service_name {
            check.require_non_empty("serviceName", name);
        }
        if let Some(email) = &self.user_email {
            check.require_email("userEmail", email);
        }
        if let Some(email) = &self.service_provider_email {
            check.require_email("serviceProviderEmail", email);
        }
        if let Some(price) = self.price {
            check.require_price("price", price);
        }
        check.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> Service {
        Service {
            service_name: "Lawn mowing".to_string(),
            price: 40.0,
            service_provider_email: "provider@example.com".to_string(),
            service_provider_name: Some("Pat".to_string()),
            service_provider_image: None,
            service_image: None,
            service_area: Some("Springfield".to_string()),
            description: None,
        }
    }

    #[test]
    fn valid_service_passes() {
        assert!(service().validate().is_ok());
    }

    #[test]
    fn service_rejects_bad_email_and_price() {
        let mut s = service();
        s.service_provider_email = "not-an-email".to_string();
        s.price = -1.0;
        let err = s.validate().unwrap_err();
        assert!(err.field_errors.contains_key("serviceProviderEmail"));
        assert!(err.field_errors.contains_key("price"));
    }

    #[test]
    fn service_serializes_camel_case() {
        let value = serde_json::to_value(service()).unwrap();
        assert_eq!(value["serviceName"], "Lawn mowing");
        assert_eq!(value["serviceProviderEmail"], "provider@example.com");
        // Absent optionals are omitted, keeping merge-patch clean
        assert!(value.get("serviceImage").is_none());
    }

    #[test]
    fn patch_only_validates_present_fields() {
        let patch = ServicePatch {
            price: Some(55.0),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        let patch = ServicePatch {
            service_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn booking_requires_both_emails() {
        let booking: Booking = serde_json::from_value(json!({
            "serviceName": "Lawn mowing",
            "price": 40.0,
            "userEmail": "user@example.com",
            "serviceProviderEmail": "provider@example.com",
            "serviceDate": "2024-06-01",
            "status": "pending"
        }))
        .unwrap();
        assert!(booking.validate().is_ok());

        let mut bad = booking;
        bad.user_email = "nope".to_string();
        assert!(bad.validate().unwrap_err().field_errors.contains_key("userEmail"));
    }
}
