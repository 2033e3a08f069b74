use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Public view of an account
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Row used only for login; never serialized
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
}
