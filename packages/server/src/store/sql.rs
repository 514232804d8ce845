use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use super::{Account, NewSubmission, OwnedSubmission, RegistrationStore, Submission};
use crate::database::{Database, StoreError};

const SUBMISSION_COLUMNS: &str = "s.id, s.user_id, s.full_name, s.batch_number, s.phone_number, \
     s.department, s.society_affiliation, s.interests, s.emergency_contact, \
     s.dietary_preferences, s.created_at";

/// [`RegistrationStore`] backed by the SQL [`Database`] adapter.
#[derive(Clone)]
pub struct SqlStore {
    db: Database,
}

impl SqlStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RegistrationStore for SqlStore {
    #[instrument(skip(self))]
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.db
            .query_one(
                "SELECT id, email, password, created_at FROM users WHERE email = ?",
                vec![email.into()],
            )
            .await
    }

    #[instrument(skip(self, password))]
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, StoreError> {
        let created_at = Utc::now();
        let outcome = self
            .db
            .execute(
                "INSERT INTO users (email, password, created_at) VALUES (?, ?, ?)",
                vec![email.into(), password.into(), created_at.into()],
            )
            .await?;

        let id = outcome
            .last_insert_id
            .and_then(|id| i32::try_from(id).ok())
            .ok_or(StoreError::MissingInsertId)?;

        Ok(Account {
            id,
            email: email.to_owned(),
            password: password.to_owned(),
            created_at,
        })
    }

    #[instrument(skip(self, password))]
    async fn update_password(&self, account_id: i32, password: &str) -> Result<(), StoreError> {
        self.db
            .execute(
                "UPDATE users SET password = ? WHERE id = ?",
                vec![password.into(), account_id.into()],
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self, submission))]
    async fn insert_submission(
        &self,
        owner: i32,
        submission: &NewSubmission,
    ) -> Result<i32, StoreError> {
        let outcome = self
            .db
            .execute(
                "INSERT INTO students (
                    user_id, full_name, batch_number, phone_number, department,
                    society_affiliation, interests, emergency_contact, dietary_preferences,
                    created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                vec![
                    owner.into(),
                    submission.full_name.as_str().into(),
                    submission.batch_number.as_str().into(),
                    submission.phone_number.as_str().into(),
                    submission.department.clone().into(),
                    submission.society_affiliation.clone().into(),
                    submission.interests.clone().into(),
                    submission.emergency_contact.clone().into(),
                    submission.dietary_preferences.clone().into(),
                    Utc::now().into(),
                ],
            )
            .await?;

        outcome
            .last_insert_id
            .and_then(|id| i32::try_from(id).ok())
            .ok_or(StoreError::MissingInsertId)
    }

    #[instrument(skip(self))]
    async fn list_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM students s ORDER BY s.created_at DESC, s.id DESC"
        );
        self.db.query_all(&sql, vec![]).await
    }

    #[instrument(skip(self))]
    async fn list_owned_submissions(&self) -> Result<Vec<OwnedSubmission>, StoreError> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS}, u.email FROM students s \
             JOIN users u ON s.user_id = u.id \
             ORDER BY s.created_at DESC, s.id DESC"
        );
        self.db.query_all(&sql, vec![]).await
    }

    fn backend_name(&self) -> &'static str {
        self.db.backend().name()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await
    }
}
