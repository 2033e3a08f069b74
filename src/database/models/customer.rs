use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}
