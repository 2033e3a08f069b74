// handlers/posts.rs - blog post CRUD

use axum::extract::State;

use crate::database::models::Post;
use crate::database::{Page, PostRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ResourceId, ValidJson, ValidQuery};
use crate::state::AppState;
use crate::validation::schemas::{ListQuery, PostInput, PostPatch};

/// GET /posts - newest first
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Page<Post>> {
    let page = PostRepository::new(&state.pool).list(&query).await?;
    Ok(ApiResponse::success(page))
}

/// GET /posts/:id
pub async fn get(State(state): State<AppState>, ResourceId(id): ResourceId) -> ApiResult<Post> {
    let post = PostRepository::new(&state.pool)
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Post not found"))?;
    Ok(ApiResponse::success(post))
}

pub async fn create(
    State(state): State<AppState>,
    auth: Result<AuthUser, ApiError>,
    ValidJson(input): ValidJson<PostInput>,
) -> ApiResult<Post> {
    let user = auth?;
    let post = PostRepository::new(&state.pool)
        .create(&input)
        .await
        .map_err(|e| ApiError::from_db(e, "Invalid post data"))?;

    tracing::info!(post_id = post.id, user_id = user.user_id, "post created");
    Ok(ApiResponse::created(post))
}

pub async fn update(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    auth: Result<AuthUser, ApiError>,
    ValidJson(patch): ValidJson<PostPatch>,
) -> ApiResult<Post> {
    let user = auth?;
    let post = PostRepository::new(&state.pool)
        .update(id, &patch)
        .await
        .map_err(|e| ApiError::from_db(e, "Post not found or invalid data"))?;

    tracing::info!(post_id = id, user_id = user.user_id, "post updated");
    Ok(ApiResponse::success(post))
}

pub async fn delete(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    user: AuthUser,
) -> ApiResult<()> {
    PostRepository::new(&state.pool)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Post not found"))?;

    tracing::info!(post_id = id, user_id = user.user_id, "post deleted");
    Ok(ApiResponse::no_content())
}
