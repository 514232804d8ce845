use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::{optional, present};
use crate::store::{NewSubmission, Submission};

/// Confirmation returned after a successful registration.
pub const SUBMISSION_RECEIVED: &str = "Thank you! Your Cultural Day registration is received.";

/// Cultural-festival registration form.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    #[schema(example = "Zara")]
    pub full_name: Option<String>,
    #[schema(example = "BSCS21")]
    pub batch_number: Option<String>,
    #[schema(example = "0300")]
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub society_affiliation: Option<String>,
    pub interests: Option<String>,
    pub emergency_contact: Option<String>,
    pub dietary_preferences: Option<String>,
}

pub fn validate_create_submission(
    payload: CreateSubmissionRequest,
) -> Result<NewSubmission, AppError> {
    let (Some(full_name), Some(batch_number), Some(phone_number)) = (
        present(payload.full_name),
        present(payload.batch_number),
        present(payload.phone_number),
    ) else {
        return Err(AppError::BadRequest(
            "Full name, batch number, and phone number are required.".into(),
        ));
    };

    Ok(NewSubmission {
        full_name,
        batch_number,
        phone_number,
        department: optional(payload.department),
        society_affiliation: optional(payload.society_affiliation),
        interests: optional(payload.interests),
        emergency_contact: optional(payload.emergency_contact),
        dietary_preferences: optional(payload.dietary_preferences),
    })
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionResponse {
    #[schema(example = "Thank you! Your Cultural Day registration is received.")]
    pub message: String,
    #[schema(example = 1)]
    pub submission_id: i32,
}

/// One registration as exposed over the API.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: i32,
    pub full_name: String,
    pub batch_number: String,
    pub phone_number: String,
    pub department: Option<String>,
    pub society_affiliation: Option<String>,
    pub interests: Option<String>,
    pub emergency_contact: Option<String>,
    pub dietary_preferences: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            full_name: s.full_name,
            batch_number: s.batch_number,
            phone_number: s.phone_number,
            department: s.department,
            society_affiliation: s.society_affiliation,
            interests: s.interests,
            emergency_contact: s.emergency_contact,
            dietary_preferences: s.dietary_preferences,
            created_at: s.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionListResponse {
    pub submissions: Vec<SubmissionResponse>,
}
