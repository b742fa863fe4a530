//! API request and response types.

use crate::error::ApiError;
use market_store::{Advertisement, AdvertisementDraft};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to start phone sign-in.
#[derive(Debug, Deserialize)]
pub struct RequestOtpRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Acknowledgment after a code was issued. Never carries the code.
#[derive(Debug, Serialize)]
pub struct RequestOtpResponse {
    pub message: String,
    pub phone: String,
}

/// Request to complete phone sign-in.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: Option<String>,
    pub otp: Option<String>,
}

/// Response after successful phone sign-in.
#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub token: String,
}

/// Request for federated sign-in.
#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    pub name: Option<String>,
    #[serde(rename = "googleId")]
    pub google_id: Option<String>,
    pub email: Option<String>,
}

/// Response after federated sign-in.
#[derive(Debug, Serialize)]
pub struct GoogleLoginResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "googleId")]
    pub google_id: String,
    pub email: String,
    pub token: String,
}

/// Listing submission.
#[derive(Debug, Deserialize)]
pub struct CreateAdvertisementRequest {
    pub category: Option<String>,
    #[serde(rename = "subCategory")]
    pub sub_category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<serde_json::Value>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub images: Option<Vec<String>>,
}

impl CreateAdvertisementRequest {
    /// Service-level validation: every required field present, price
    /// coerced to a number. Schema constraints are the store's job.
    pub fn into_draft(self) -> Result<AdvertisementDraft, ApiError> {
        let mut missing = Vec::new();

        let category = require(self.category, "category", &mut missing);
        let sub_category = require(self.sub_category, "subCategory", &mut missing);
        let title = require(self.title, "title", &mut missing);
        let description = require(self.description, "description", &mut missing);
        let location = require(self.location, "location", &mut missing);
        let phone = require(self.phone, "phone", &mut missing);
        let price = self.price;
        if price.is_none() {
            missing.push("price");
        }
        let images = self.images;
        if images.is_none() {
            missing.push("images");
        }

        if !missing.is_empty() {
            return Err(ApiError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(AdvertisementDraft {
            category: category.unwrap(),
            sub_category: sub_category.unwrap(),
            title: title.unwrap(),
            description: description.unwrap(),
            price: coerce_price(price.unwrap())?,
            location: location.unwrap(),
            phone: phone.unwrap(),
            images: images.unwrap(),
        })
    }
}

fn require(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            missing.push(field);
            None
        }
    }
}

/// Accept both JSON numbers and numeric strings for price.
fn coerce_price(value: serde_json::Value) -> Result<f64, ApiError> {
    let price = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    price.ok_or_else(|| ApiError::Validation("Price must be a number".to_string()))
}

/// Response after creating a listing.
#[derive(Debug, Serialize)]
pub struct CreateAdvertisementResponse {
    pub message: String,
    pub advertisement: Advertisement,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub users: usize,
    pub advertisements: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_request() -> CreateAdvertisementRequest {
        serde_json::from_value(json!({
            "category": "Electronics",
            "subCategory": "Phones",
            "title": "Barely used handset",
            "description": "One year old, minor scratches on the back.",
            "price": 120,
            "location": "Springfield",
            "phone": "9876543210",
            "images": ["https://img.example/1.jpg"]
        }))
        .unwrap()
    }

    #[test]
    fn test_full_request_converts() {
        let draft = full_request().into_draft().unwrap();
        assert_eq!(draft.sub_category, "Phones");
        assert_eq!(draft.price, 120.0);
    }

    #[test]
    fn test_missing_fields_are_all_named() {
        let request: CreateAdvertisementRequest = serde_json::from_value(json!({
            "title": "Barely used handset"
        }))
        .unwrap();

        let err = request.into_draft().unwrap_err();
        let message = err.to_string();
        for field in ["category", "subCategory", "description", "price", "location", "phone", "images"] {
            assert!(message.contains(field), "{message} should name {field}");
        }
        assert!(!message.contains("title"));
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut request = full_request();
        request.location = Some("   ".into());
        assert!(request.into_draft().is_err());
    }

    #[test]
    fn test_price_coerced_from_string() {
        let mut request = full_request();
        request.price = Some(json!("249.99"));
        assert_eq!(request.into_draft().unwrap().price, 249.99);
    }

    #[test]
    fn test_non_numeric_price_rejected() {
        let mut request = full_request();
        request.price = Some(json!("a lot"));
        assert!(request.into_draft().is_err());
    }

    #[test]
    fn test_empty_images_list_is_present_but_schema_invalid() {
        let mut request = full_request();
        request.images = Some(vec![]);
        // Presence check passes; the store rejects it later
        let draft = request.into_draft().unwrap();
        assert!(draft.validate().is_err());
    }
}
