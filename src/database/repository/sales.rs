use sqlx::PgPool;

use crate::database::models::{Sale, SaleDetail};
use crate::database::DatabaseError;
use crate::validation::schemas::{SaleInput, SalePatch};

use super::Page;

const COLUMNS: &str = "id, date, quantity, total_price, product_id, customer_id, created_at";
const FILTER: &str = "($1::int IS NULL OR product_id = $1) AND ($2::int IS NULL OR customer_id = $2)";

/// Optional parent filters shared by every sale listing
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleFilter {
    pub product_id: Option<i32>,
    pub customer_id: Option<i32>,
}

impl SaleFilter {
    pub fn product(id: i32) -> Self {
        Self { product_id: Some(id), customer_id: None }
    }

    pub fn customer(id: i32) -> Self {
        Self { product_id: None, customer_id: Some(id) }
    }
}

pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, filter: SaleFilter) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM sales WHERE {FILTER}"))
            .bind(filter.product_id)
            .bind(filter.customer_id)
            .fetch_one(self.pool)
            .await?;
        Ok(total)
    }

    /// Most recent sales first
    pub async fn list(&self, filter: SaleFilter, skip: i64, take: i64) -> Result<Page<Sale>, DatabaseError> {
        let total = self.count(filter).await?;

        let list = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {COLUMNS} FROM sales WHERE {FILTER}
             ORDER BY date DESC, id DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(filter.product_id)
        .bind(filter.customer_id)
        .bind(take)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(Page::new(total, skip, take, list))
    }

    /// Sales joined with product and customer names
    pub async fn list_details(
        &self,
        filter: SaleFilter,
        skip: i64,
        take: i64,
    ) -> Result<Page<SaleDetail>, DatabaseError> {
        let total = self.count(filter).await?;

        let list = sqlx::query_as::<_, SaleDetail>(
            "SELECT s.id, s.date, s.quantity, s.total_price,
                    s.product_id, p.name AS product_name, p.unit,
                    s.customer_id, c.name AS customer_name,
                    s.created_at
             FROM sales s
             JOIN products p ON p.id = s.product_id
             LEFT JOIN customers c ON c.id = s.customer_id
             WHERE ($1::int IS NULL OR s.product_id = $1)
               AND ($2::int IS NULL OR s.customer_id = $2)
             ORDER BY s.date DESC, s.id DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(filter.product_id)
        .bind(filter.customer_id)
        .bind(take)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(Page::new(total, skip, take, list))
    }

    pub async fn get(&self, id: i32) -> Result<Sale, DatabaseError> {
        let sale = sqlx::query_as::<_, Sale>(&format!("SELECT {COLUMNS} FROM sales WHERE id = $1"))
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(sale)
    }

    /// Unknown product or customer ids are rejected by the foreign keys
    pub async fn create(&self, input: &SaleInput) -> Result<Sale, DatabaseError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "INSERT INTO sales (date, quantity, total_price, product_id, customer_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(input.date)
        .bind(input.quantity)
        .bind(input.total_price)
        .bind(input.product_id)
        .bind(input.customer_id)
        .fetch_one(self.pool)
        .await?;
        Ok(sale)
    }

    pub async fn update(&self, id: i32, patch: &SalePatch) -> Result<Sale, DatabaseError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "UPDATE sales SET
                date = COALESCE($2, date),
                quantity = COALESCE($3, quantity),
                total_price = COALESCE($4, total_price),
                product_id = COALESCE($5, product_id),
                customer_id = CASE WHEN $6 THEN $7 ELSE customer_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.date)
        .bind(patch.quantity)
        .bind(patch.total_price)
        .bind(patch.product_id)
        .bind(patch.customer_id.is_some())
        .bind(patch.customer_id.flatten())
        .fetch_one(self.pool)
        .await?;
        Ok(sale)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
