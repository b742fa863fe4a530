//! Classifieds marketplace REST API.
//!
//! Thin HTTP layer over the document store: phone/OTP and Google
//! sign-in, bearer-token access control, advertisement submission and
//! browsing.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::ApiError;
