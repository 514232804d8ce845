use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::present;

/// Request body for login. An unseen email creates the account.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Account email; trimmed and lowercased before use.
    #[schema(example = "A@X.com")]
    pub email: Option<String>,
    #[schema(example = "p1")]
    pub password: Option<String>,
}

/// Login input after presence checks and email normalisation.
#[derive(Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn validate_login_request(payload: LoginRequest) -> Result<Credentials, AppError> {
    let email = present(payload.email)
        .map(|email| normalize_email(&email))
        .filter(|email| !email.is_empty());

    match (email, present(payload.password)) {
        (Some(email), Some(password)) => Ok(Credentials { email, password }),
        _ => Err(AppError::BadRequest(
            "Please provide both email and password.".into(),
        )),
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "a@x.com")]
    pub email: String,
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token valid for 8 hours.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserSummary,
}
