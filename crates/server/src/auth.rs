use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ozbooks_core::UserId;

use crate::error::AppError;

/// Header set by the authenticating proxy in front of the service.
pub const USER_HEADER: &str = "x-user-id";

/// The caller's identity. Handlers that take this reject anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| AuthUser(UserId::from(v)))
            .ok_or(AppError::Unauthorized)
    }
}
