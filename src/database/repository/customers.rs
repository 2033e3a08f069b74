use sqlx::PgPool;

use crate::database::models::Customer;
use crate::database::DatabaseError;
use crate::validation::schemas::{CustomerInput, CustomerPatch, ListQuery};

use super::Page;

const COLUMNS: &str = "id, name, phone, memo, created_at";
const SEARCH: &str = "($1::text IS NULL OR name ILIKE $1 OR phone ILIKE $1)";

pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Customers ordered by id; `search` matches name or phone
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Customer>, DatabaseError> {
        let pattern = query.search_pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM customers WHERE {SEARCH}"))
            .bind(pattern.as_deref())
            .fetch_one(self.pool)
            .await?;

        let list = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {COLUMNS} FROM customers WHERE {SEARCH} ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(query.take)
        .bind(query.skip)
        .fetch_all(self.pool)
        .await?;

        Ok(Page::new(total, query.skip, query.take, list))
    }

    pub async fn get(&self, id: i32) -> Result<Customer, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(&format!("SELECT {COLUMNS} FROM customers WHERE id = $1"))
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(customer)
    }

    pub async fn create(&self, input: &CustomerInput) -> Result<Customer, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (name, phone, memo) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.phone)
        .bind(input.memo.as_deref())
        .fetch_one(self.pool)
        .await?;
        Ok(customer)
    }

    /// `memo: null` in the patch clears the memo; an absent memo keeps it
    pub async fn update(&self, id: i32, patch: &CustomerPatch) -> Result<Customer, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "UPDATE customers SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                memo = CASE WHEN $4 THEN $5 ELSE memo END
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.memo.is_some())
        .bind(patch.memo.as_ref().and_then(|memo| memo.as_deref()))
        .fetch_one(self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
