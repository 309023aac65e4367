use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    auth::repo_types::User,
    config::AppConfig,
    store::{RecordStore, StoreError, StoreResult},
    submissions::repo_types::{NewSubmission, Submission},
};

/// Open the pool and bring the schema up to date.
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run database migrations")?;

    Ok(db)
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, name: Option<&str>, email: &str) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateEmail
            }
            other => StoreError::Database(other),
        })?;
        Ok(user)
    }

    async fn create_submission(&self, new: NewSubmission) -> StoreResult<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (id, name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.email)
        .bind(new.message)
        .fetch_one(&self.db)
        .await?;
        Ok(submission)
    }

    async fn find_submission(&self, id: Uuid) -> StoreResult<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, name, email, message, created_at
            FROM submissions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(submission)
    }

    async fn latest_submission_for(&self, email: &str) -> StoreResult<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, name, email, message, created_at
            FROM submissions
            WHERE email = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(submission)
    }

    async fn list_submissions(&self) -> StoreResult<Vec<Submission>> {
        let rows = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, name, email, message, created_at
            FROM submissions
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "needs a running Postgres at DATABASE_URL"]
    async fn duplicate_registration_maps_to_duplicate_email() {
        let config = AppConfig::from_env();
        let store = PgStore::new(connect(&config).await.expect("database reachable"));
        let email = format!("{}@example.test", Uuid::new_v4());

        store.create_user(Some("Ann"), &email).await.expect("first insert");
        let err = store.create_user(None, &email).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let found = store.find_user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("Ann"));
    }
}
