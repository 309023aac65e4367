use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Submission record in the database. Linked to users by email value only.
#[derive(Debug, Clone, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Fields accepted from the submit form, stored as-is.
#[derive(Debug, Clone, Default)]
pub struct NewSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}
