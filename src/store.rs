use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::repo_types::User,
    submissions::repo_types::{NewSubmission, Submission},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a user with this email is already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data access handle for the users and submissions collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken.
    async fn create_user(&self, name: Option<&str>, email: &str) -> StoreResult<User>;

    async fn create_submission(&self, new: NewSubmission) -> StoreResult<Submission>;

    async fn find_submission(&self, id: Uuid) -> StoreResult<Option<Submission>>;

    /// Most recent submission carrying this email, by creation time.
    async fn latest_submission_for(&self, email: &str) -> StoreResult<Option<Submission>>;

    /// Every submission, newest first.
    async fn list_submissions(&self) -> StoreResult<Vec<Submission>>;
}
