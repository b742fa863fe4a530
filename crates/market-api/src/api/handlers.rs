//! HTTP request handlers.

use super::types::{
    CreateAdvertisementRequest, CreateAdvertisementResponse, GoogleLoginRequest,
    GoogleLoginResponse, HealthResponse, RequestOtpRequest, RequestOtpResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};
use super::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use market_store::{is_valid_phone, Advertisement, Credential, User};
use tracing::info;
use uuid::Uuid;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        users: state.store.user_count().await,
        advertisements: state.store.advertisement_count().await,
    })
}

/// Step 1 of phone sign-in: issue a verification code.
///
/// Creates the user on first contact. The code goes to the
/// operational log, standing in for an SMS gateway; it is never
/// returned to the caller.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(request): Json<RequestOtpRequest>,
) -> Result<Json<RequestOtpResponse>, ApiError> {
    let (name, phone) = match (non_empty(request.name), non_empty(request.phone)) {
        (Some(name), Some(phone)) => (name, phone),
        _ => return Err(ApiError::Validation("Name and phone are required".into())),
    };
    if !is_valid_phone(&phone) {
        return Err(ApiError::Validation("Phone must be a 10-digit number".into()));
    }

    let credential = Credential::Phone(phone.clone());
    if state.store.find_user(&credential).await.is_none() {
        let user = state
            .store
            .insert_user(User::new(&name, credential, None))
            .await?;
        info!(phone = %phone, user = %user.id, "User created on first OTP request");
    }

    let code = state.otp.issue(&phone).await;
    info!(phone = %phone, code = %code, "OTP issued");

    Ok(Json(RequestOtpResponse {
        message: "OTP sent successfully".to_string(),
        phone,
    }))
}

/// Step 2 of phone sign-in: trade a valid code for a bearer token.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, ApiError> {
    let (phone, otp) = match (non_empty(request.phone), non_empty(request.otp)) {
        (Some(phone), Some(otp)) => (phone, otp),
        _ => return Err(ApiError::Validation("Phone and OTP are required".into())),
    };
    if otp.len() != 6 || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation("OTP must be a 6-digit number".into()));
    }

    let user = state
        .store
        .find_user(&Credential::Phone(phone.clone()))
        .await
        .ok_or(ApiError::NotFound("User"))?;

    state.otp.verify(&phone, &otp).await?;

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(phone = %phone, user = %user.id, "OTP verified");

    Ok(Json(VerifyOtpResponse {
        id: user.id,
        name: user.name,
        phone,
        token,
    }))
}

/// Federated sign-in. Creates the user on first login and keeps the
/// display name in sync afterwards.
pub async fn google_login(
    State(state): State<AppState>,
    Json(request): Json<GoogleLoginRequest>,
) -> Result<Json<GoogleLoginResponse>, ApiError> {
    let (name, google_id, email) = match (
        non_empty(request.name),
        non_empty(request.google_id),
        non_empty(request.email),
    ) {
        (Some(name), Some(google_id), Some(email)) => (name, google_id, email),
        _ => {
            return Err(ApiError::Validation(
                "Name, Google ID and email are required".into(),
            ))
        }
    };

    let existing = match state
        .store
        .find_user(&Credential::Google(google_id.clone()))
        .await
    {
        Some(user) => Some(user),
        None => state.store.find_user_by_email(&email).await,
    };

    let user = match existing {
        Some(user) if user.name != name => state
            .store
            .rename_user(user.id, &name)
            .await
            .ok_or_else(|| ApiError::Internal("user disappeared during rename".into()))?,
        Some(user) => user,
        None => {
            let user = state
                .store
                .insert_user(User::new(
                    &name,
                    Credential::Google(google_id.clone()),
                    Some(email.clone()),
                ))
                .await?;
            info!(user = %user.id, "User created on first Google login");
            user
        }
    };

    let token = state
        .tokens
        .issue(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(GoogleLoginResponse {
        id: user.id,
        name: user.name,
        google_id: user.google_id.unwrap_or(google_id),
        email: user.email.unwrap_or(email),
        token,
    }))
}

/// Create a listing owned by the authenticated caller.
pub async fn create_advertisement(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateAdvertisementRequest>,
) -> Result<(StatusCode, Json<CreateAdvertisementResponse>), ApiError> {
    let draft = request.into_draft()?;

    let advertisement = state.store.insert_advertisement(caller.id, draft).await?;
    info!(user = %caller.id, advertisement = %advertisement.id, "Advertisement created");

    Ok((
        StatusCode::CREATED,
        Json(CreateAdvertisementResponse {
            message: "Advertisement created successfully".to_string(),
            advertisement,
        }),
    ))
}

/// Public listing feed, newest first.
pub async fn list_advertisements(State(state): State<AppState>) -> Json<Vec<Advertisement>> {
    Json(state.store.list_advertisements().await)
}

/// Single listing, for the detail page.
pub async fn get_advertisement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Advertisement>, ApiError> {
    state
        .store
        .get_advertisement(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Advertisement"))
}

/// Treat missing and blank fields the same.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
