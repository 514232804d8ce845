use axum::{
    Json,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::{AdminAccess, admin_token, secret_matches};
use crate::extractors::json::AppJson;
use crate::models::admin::{
    AdminLoginRequest, AdminLoginResponse, AdminSubmissionListResponse, AdminSubmissionResponse,
};
use crate::state::AppState;

const EXPORT_DISPOSITION: &str = "attachment; filename=\"submissions.json\"";

async fn owned_submissions(state: &AppState) -> Result<Vec<AdminSubmissionResponse>, AppError> {
    Ok(state
        .store
        .list_owned_submissions()
        .await?
        .into_iter()
        .map(AdminSubmissionResponse::from)
        .collect())
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    operation_id = "adminLogin",
    summary = "Exchange the admin password for an admin token",
    description = "The returned token is the base64 encoding of the shared admin secret. \
        Send it as `Authorization: Bearer <token>` on admin routes.",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Correct password", body = AdminLoginResponse),
        (status = 401, description = "Wrong password (UNAUTHORIZED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let secret = &state.config.admin.password;
    let password = payload.password.unwrap_or_default();

    if !secret_matches(&password, secret) {
        return Err(AppError::AdminUnauthorized);
    }

    Ok(Json(AdminLoginResponse {
        token: admin_token(secret),
    }))
}

#[utoipa::path(
    get,
    path = "/admin/submissions",
    tag = "Admin",
    operation_id = "adminListSubmissions",
    summary = "List every registration with its owner's email",
    description = "Requires the admin secret as `?password=`, an `X-Admin-Password` header, or the admin bearer token.",
    params(("password" = Option<String>, Query, description = "Admin shared secret")),
    responses(
        (status = 200, description = "Registrations", body = AdminSubmissionListResponse),
        (status = 401, description = "Wrong admin secret (UNAUTHORIZED)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin))]
pub async fn list_submissions(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> Result<Json<AdminSubmissionListResponse>, AppError> {
    let submissions = owned_submissions(&state).await?;

    Ok(Json(AdminSubmissionListResponse {
        total: submissions.len(),
        submissions,
    }))
}

#[utoipa::path(
    get,
    path = "/admin/export",
    tag = "Admin",
    operation_id = "adminExportSubmissions",
    summary = "Download every registration as a JSON file",
    params(("password" = Option<String>, Query, description = "Admin shared secret")),
    responses(
        (status = 200, description = "JSON attachment", body = Vec<AdminSubmissionResponse>),
        (status = 401, description = "Wrong admin secret (UNAUTHORIZED)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, _admin))]
pub async fn export_submissions(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let submissions = owned_submissions(&state).await?;
    info!(count = submissions.len(), "Exporting registrations");

    Ok((
        [
            (CONTENT_TYPE, "application/json"),
            (CONTENT_DISPOSITION, EXPORT_DISPOSITION),
        ],
        Json(submissions),
    ))
}
