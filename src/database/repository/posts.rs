use sqlx::PgPool;

use crate::database::models::Post;
use crate::database::DatabaseError;
use crate::validation::schemas::{ListQuery, PostInput, PostPatch};

use super::Page;

const COLUMNS: &str = "id, title, content, created_at";
const SEARCH: &str = "($1::text IS NULL OR title ILIKE $1 OR content ILIKE $1)";

pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Newest posts first
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Post>, DatabaseError> {
        let pattern = query.search_pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM posts WHERE {SEARCH}"))
            .bind(pattern.as_deref())
            .fetch_one(self.pool)
            .await?;

        let list = sqlx::query_as::<_, Post>(&format!(
            "SELECT {COLUMNS} FROM posts WHERE {SEARCH}
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(pattern.as_deref())
        .bind(query.take)
        .bind(query.skip)
        .fetch_all(self.pool)
        .await?;

        Ok(Page::new(total, query.skip, query.take, list))
    }

    pub async fn get(&self, id: i32) -> Result<Post, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(&format!("SELECT {COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(post)
    }

    pub async fn create(&self, input: &PostInput) -> Result<Post, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (title, content) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.content)
        .fetch_one(self.pool)
        .await?;
        Ok(post)
    }

    pub async fn update(&self, id: i32, patch: &PostPatch) -> Result<Post, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content)
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.content.as_deref())
        .fetch_one(self.pool)
        .await?;
        Ok(post)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
