use sqlx::PgPool;

use crate::database::models::{User, UserCredentials};
use crate::database::DatabaseError;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account. A taken email surfaces as a unique-violation
    /// `DatabaseError::Constraint`.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id, email, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, DatabaseError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(credentials)
    }
}
