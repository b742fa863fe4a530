//! User and advertisement document types.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A credential a user can sign in with.
///
/// Lookup is keyed on whichever kind the caller holds; a user created
/// from one kind carries no value for the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// 10-digit phone number, proven by OTP.
    Phone(String),
    /// Google account id, proven by the identity provider.
    Google(String),
}

/// An identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user from the credential they first signed in with.
    pub fn new(name: impl Into<String>, credential: Credential, email: Option<String>) -> Self {
        let now = Utc::now();
        let (phone, google_id) = match credential {
            Credential::Phone(number) => (Some(number), None),
            Credential::Google(id) => (None, Some(id)),
        };
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone,
            google_id,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the display name.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Whether this user holds the given credential.
    pub fn matches(&self, credential: &Credential) -> bool {
        match credential {
            Credential::Phone(number) => self.phone.as_deref() == Some(number.as_str()),
            Credential::Google(id) => self.google_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// A listing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub category: String,
    pub sub_category: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub phone: String,
    pub images: Vec<String>,
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A listing submission before schema validation.
#[derive(Debug, Clone)]
pub struct AdvertisementDraft {
    pub category: String,
    pub sub_category: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub phone: String,
    pub images: Vec<String>,
}

impl AdvertisementDraft {
    /// Check every schema constraint, reporting all violations at once.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut violations = Vec::new();

        if self.category.trim().is_empty() {
            violations.push("Category is required".to_string());
        }
        if self.sub_category.trim().is_empty() {
            violations.push("Subcategory is required".to_string());
        }
        let title_len = self.title.trim().chars().count();
        if title_len < 5 {
            violations.push("Title must be at least 5 characters".to_string());
        } else if title_len > 70 {
            violations.push("Title must be less than 70 characters".to_string());
        }
        if self.description.trim().chars().count() < 10 {
            violations.push("Description must be at least 10 characters".to_string());
        }
        if self.price.is_nan() || self.price < 0.0 {
            violations.push("Price must be a non-negative number".to_string());
        }
        if self.location.trim().is_empty() {
            violations.push("Location is required".to_string());
        }
        if !is_valid_phone(&self.phone) {
            violations.push("Please enter a valid 10-digit phone number".to_string());
        }
        if self.images.is_empty() {
            violations.push("At least one image is required".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Schema { violations })
        }
    }
}

/// Check that a phone number is exactly ten ASCII digits.
pub fn is_valid_phone(number: &str) -> bool {
    number.len() == 10 && number.chars().all(|c| c.is_ascii_digit())
}
