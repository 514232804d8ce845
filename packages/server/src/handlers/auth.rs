use axum::{Json, extract::State};
use tracing::{debug, info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::{LoginRequest, LoginResponse, UserSummary, validate_login_request};
use crate::state::AppState;
use crate::store::{Account, RegistrationStore};
use crate::utils::credential;
use crate::utils::jwt::Identity;

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in, creating the account on first use",
    description = "Looks up the account by normalised email. An unseen email creates a new account; \
        an existing account has its stored password replaced by the one supplied. Returns a bearer token valid for 8 hours.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing email or password (BAD_REQUEST)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let creds = validate_login_request(payload)?;

    let account = upsert_account(
        state.store.as_ref(),
        &creds.email,
        &credential::stored_form(&creds.password),
    )
    .await?;

    let token = state.tokens.issue(&Identity {
        account_id: account.id,
        email: account.email.clone(),
    })?;

    Ok(Json(LoginResponse {
        token,
        user: UserSummary {
            id: account.id,
            email: account.email,
        },
    }))
}

/// Find the account for `email` and set its password, creating it if needed.
///
/// Login doubles as registration and as an unverified password reset: an
/// existing account always takes the supplied password. A concurrent first
/// login for the same email surfaces here as a unique violation; the row the
/// other request created is then treated as the existing account.
pub async fn upsert_account(
    store: &dyn RegistrationStore,
    email: &str,
    password: &str,
) -> Result<Account, AppError> {
    if let Some(existing) = store.find_account_by_email(email).await? {
        return overwrite_password(store, existing, password).await;
    }

    match store.create_account(email, password).await {
        Ok(account) => {
            info!(account_id = account.id, "Created account");
            Ok(account)
        }
        Err(e) if e.is_unique_violation() => {
            debug!("Concurrent first login: unique constraint caught on insert");
            let existing = store.find_account_by_email(email).await?.ok_or_else(|| {
                AppError::Internal(format!("account for {email} vanished after conflict"))
            })?;
            overwrite_password(store, existing, password).await
        }
        Err(e) => Err(e.into()),
    }
}

async fn overwrite_password(
    store: &dyn RegistrationStore,
    mut account: Account,
    password: &str,
) -> Result<Account, AppError> {
    store.update_password(account.id, password).await?;
    account.password = password.to_owned();
    Ok(account)
}
