use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::student::{
    CreateSubmissionRequest, CreateSubmissionResponse, SUBMISSION_RECEIVED,
    SubmissionListResponse, SubmissionResponse, validate_create_submission,
};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/students",
    tag = "Students",
    operation_id = "createSubmission",
    summary = "Submit a festival registration",
    description = "Stores a registration owned by the authenticated account. Empty optional fields are stored as null.",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Registration stored", body = CreateSubmissionResponse),
        (status = 400, description = "Missing required fields (BAD_REQUEST)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(account_id = auth_user.account_id))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let submission = validate_create_submission(payload)?;

    let submission_id = state
        .store
        .insert_submission(auth_user.account_id, &submission)
        .await?;

    info!(submission_id, "Registration received");

    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse {
            message: SUBMISSION_RECEIVED.into(),
            submission_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/students",
    tag = "Students",
    operation_id = "listSubmissions",
    summary = "List all registrations",
    description = "Returns every registration, most recent first.",
    responses(
        (status = 200, description = "Registrations", body = SubmissionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(account_id = auth_user.account_id))]
pub async fn list_submissions(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let submissions = state
        .store
        .list_submissions()
        .await?
        .into_iter()
        .map(SubmissionResponse::from)
        .collect();

    Ok(Json(SubmissionListResponse { submissions }))
}
