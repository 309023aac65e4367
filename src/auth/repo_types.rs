use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String, // natural lookup key
    pub created_at: OffsetDateTime,
}
