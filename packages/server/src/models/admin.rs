use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::OwnedSubmission;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "admin-secret")]
    pub password: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminLoginResponse {
    /// Base64 of the shared secret, to be sent back as a bearer token.
    pub token: String,
}

/// A registration together with the email of the account that submitted it.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSubmissionResponse {
    pub id: i32,
    pub user_id: i32,
    pub email: String,
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

impl From<OwnedSubmission> for AdminSubmissionResponse {
    fn from(s: OwnedSubmission) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            email: s.email,
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
pub struct AdminSubmissionListResponse {
    #[schema(example = 1)]
    pub total: usize,
    pub submissions: Vec<AdminSubmissionResponse>,
}
