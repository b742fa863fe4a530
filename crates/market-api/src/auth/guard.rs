//! Access guard for protected routes.

use crate::api::AppState;
use crate::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;
use uuid::Uuid;

/// Caller identity resolved from a bearer token.
///
/// Extracting this guards the route: requests without a valid token
/// are rejected 401 before the handler runs. The embedded user id is
/// re-checked against the store, so a token for a user the store no
/// longer knows is also rejected.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("no token"))?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        let claims = state
            .tokens
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("token failed"))?;

        let user = state
            .store
            .find_user_by_id(claims.sub)
            .await
            .ok_or(ApiError::Unauthorized("user not found"))?;

        debug!(user = %user.id, "Caller authenticated");
        Ok(AuthUser {
            id: user.id,
            name: user.name,
        })
    }
}
