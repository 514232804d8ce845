use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated account extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. The identity is
/// taken from the token alone; the account row is not re-read.
#[derive(Debug)]
pub struct AuthUser {
    pub account_id: i32,
    pub email: String,
}

/// Token carried by an `Authorization: Bearer <token>` header, if any.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::TokenMissing)?;

        let identity = state
            .tokens
            .verify(token)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            account_id: identity.account_id,
            email: identity.email,
        })
    }
}
