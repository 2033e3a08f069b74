// Table definitions, applied idempotently at startup and by `orchard-api migrate`.

use sqlx::PgPool;
use tracing::info;

use super::DatabaseError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            SERIAL PRIMARY KEY,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id         SERIAL PRIMARY KEY,
        name       TEXT NOT NULL,
        unit_price INTEGER NOT NULL CHECK (unit_price >= 0),
        unit       TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id         SERIAL PRIMARY KEY,
        name       TEXT NOT NULL,
        phone      TEXT NOT NULL,
        memo       TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sales (
        id          SERIAL PRIMARY KEY,
        date        TIMESTAMPTZ NOT NULL,
        quantity    INTEGER NOT NULL CHECK (quantity > 0),
        total_price INTEGER NOT NULL CHECK (total_price >= 0),
        product_id  INTEGER NOT NULL REFERENCES products (id),
        customer_id INTEGER REFERENCES customers (id),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS sales_product_id_idx ON sales (product_id)",
    "CREATE INDEX IF NOT EXISTS sales_customer_id_idx ON sales (customer_id)",
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id         SERIAL PRIMARY KEY,
        title      TEXT NOT NULL,
        content    TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

// Held for the duration of schema setup so concurrent starters run one at a time
const SCHEMA_LOCK_KEY: i64 = 0x6f72_6368_6172_64;

/// Create any missing tables and indexes
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!(statements = STATEMENTS.len(), "Database schema is up to date");
    Ok(())
}
