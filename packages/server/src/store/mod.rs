//! Account and submission persistence as seen by the HTTP handlers.

mod sql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;

use crate::database::StoreError;

pub use sql::SqlStore;

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Registration form fields, already checked for presence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubmission {
    pub full_name: String,
    pub batch_number: String,
    pub phone_number: String,
    pub department: Option<String>,
    pub society_affiliation: Option<String>,
    pub interests: Option<String>,
    pub emergency_contact: Option<String>,
    pub dietary_preferences: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct Submission {
    pub id: i32,
    pub user_id: i32,
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

/// A submission joined with its owner's email.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct OwnedSubmission {
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

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account. Fails with [`StoreError::UniqueViolation`] when
    /// the email is already taken.
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, StoreError>;

    async fn update_password(&self, account_id: i32, password: &str) -> Result<(), StoreError>;

    /// Insert a submission owned by `owner` and return its id.
    async fn insert_submission(
        &self,
        owner: i32,
        submission: &NewSubmission,
    ) -> Result<i32, StoreError>;

    /// Every submission, newest first.
    async fn list_submissions(&self) -> Result<Vec<Submission>, StoreError>;

    /// Every submission with its owner's email, newest first.
    async fn list_owned_submissions(&self) -> Result<Vec<OwnedSubmission>, StoreError>;

    /// Name of the storage backend, for diagnostics.
    fn backend_name(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;
}
