use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub quantity: i32,
    pub total_price: i32,
    pub product_id: i32,
    pub customer_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Sale joined with its product and (optional) customer, for per-parent listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub quantity: i32,
    pub total_price: i32,
    pub product_id: i32,
    pub product_name: String,
    pub unit: String,
    pub customer_id: Option<i32>,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
