use sqlx::PgPool;

use crate::database::models::Product;
use crate::database::DatabaseError;
use crate::validation::schemas::{ListQuery, ProductInput, ProductPatch};

use super::Page;

const COLUMNS: &str = "id, name, unit_price, unit, created_at";

/// Repository for product rows.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Products ordered by id, optionally filtered by a name substring
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Product>, DatabaseError> {
        let pattern = query.search_pattern();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(pattern.as_deref())
        .fetch_one(self.pool)
        .await?;

        let list = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products
             WHERE ($1::text IS NULL OR name ILIKE $1)
             ORDER BY id
             LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(query.take)
        .bind(query.skip)
        .fetch_all(self.pool)
        .await?;

        Ok(Page::new(total, query.skip, query.take, list))
    }

    pub async fn get(&self, id: i32) -> Result<Product, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(product)
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, unit_price, unit) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.unit_price)
        .bind(&input.unit)
        .fetch_one(self.pool)
        .await?;
        Ok(product)
    }

    /// Apply the fields present in `patch`; absent fields keep their value
    pub async fn update(&self, id: i32, patch: &ProductPatch) -> Result<Product, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                unit_price = COALESCE($3, unit_price),
                unit = COALESCE($4, unit)
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.unit_price)
        .bind(patch.unit.as_deref())
        .fetch_one(self.pool)
        .await?;
        Ok(product)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
