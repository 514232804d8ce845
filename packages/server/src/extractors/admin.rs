use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::extractors::auth::bearer_token;
use crate::state::AppState;

/// Header carrying the admin shared secret.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

#[derive(Deserialize)]
struct AdminQuery {
    password: Option<String>,
}

/// Proof that the caller presented the admin shared secret.
///
/// Accepted forms, checked in order: `?password=` query parameter, the
/// `X-Admin-Password` header, or `Authorization: Bearer <base64(secret)>` as
/// returned by the admin login endpoint.
#[derive(Debug)]
pub struct AdminAccess;

/// Encode the shared secret as the admin "token". Reversible by design of the
/// admin scheme; it carries no expiry or signature.
pub fn admin_token(secret: &str) -> String {
    STANDARD.encode(secret)
}

pub(crate) fn secret_matches(candidate: &str, secret: &str) -> bool {
    candidate.as_bytes().ct_eq(secret.as_bytes()).into()
}

/// An empty value in one form falls through to the next.
fn presented_secret(parts: &Parts) -> Option<String> {
    let query = Query::<AdminQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.password)
        .filter(|p| !p.is_empty());
    if query.is_some() {
        return query;
    }

    if let Some(header) = parts
        .headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return Some(header.to_owned());
    }

    let token = bearer_token(&parts.headers)?;
    let decoded = STANDARD.decode(token).ok()?;
    String::from_utf8(decoded).ok()
}

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = &state.config.admin.password;
        match presented_secret(parts) {
            Some(candidate) if secret_matches(&candidate, secret) => Ok(AdminAccess),
            _ => {
                tracing::warn!(path = %parts.uri.path(), "Rejected admin request");
                Err(AppError::AdminUnauthorized)
            }
        }
    }
}
