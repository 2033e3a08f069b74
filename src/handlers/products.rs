// handlers/products.rs - product CRUD and per-product sales

use axum::extract::State;

use crate::database::models::{Product, SaleDetail};
use crate::database::repository::SaleFilter;
use crate::database::{Page, ProductRepository, SaleRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ResourceId, ValidJson, ValidQuery};
use crate::state::AppState;
use crate::validation::schemas::{ListQuery, ProductInput, ProductPatch};

/// GET /products?skip=&take=&search=
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Page<Product>> {
    let page = ProductRepository::new(&state.pool).list(&query).await?;
    Ok(ApiResponse::success(page))
}

/// GET /products/:id
pub async fn get(State(state): State<AppState>, ResourceId(id): ResourceId) -> ApiResult<Product> {
    let product = ProductRepository::new(&state.pool)
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Product not found"))?;
    Ok(ApiResponse::success(product))
}

/// POST /products
pub async fn create(
    State(state): State<AppState>,
    auth: Result<AuthUser, ApiError>,
    ValidJson(input): ValidJson<ProductInput>,
) -> ApiResult<Product> {
    let user = auth?;
    let product = ProductRepository::new(&state.pool)
        .create(&input)
        .await
        .map_err(|e| ApiError::from_db(e, "Invalid product data"))?;

    tracing::info!(product_id = product.id, user_id = user.user_id, "product created");
    Ok(ApiResponse::created(product))
}

/// PUT /products/:id - partial update
pub async fn update(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    auth: Result<AuthUser, ApiError>,
    ValidJson(patch): ValidJson<ProductPatch>,
) -> ApiResult<Product> {
    let user = auth?;
    let product = ProductRepository::new(&state.pool)
        .update(id, &patch)
        .await
        .map_err(|e| ApiError::from_db(e, "Product not found or invalid data"))?;

    tracing::info!(product_id = id, user_id = user.user_id, "product updated");
    Ok(ApiResponse::success(product))
}

/// DELETE /products/:id
pub async fn delete(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    user: AuthUser,
) -> ApiResult<()> {
    ProductRepository::new(&state.pool)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Product not found"))?;

    tracing::info!(product_id = id, user_id = user.user_id, "product deleted");
    Ok(ApiResponse::no_content())
}

/// GET /products/:id/sales - sales of one product with customer names
pub async fn sales(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Page<SaleDetail>> {
    let page = SaleRepository::new(&state.pool)
        .list_details(SaleFilter::product(id), query.skip, query.take)
        .await?;
    Ok(ApiResponse::success(page))
}
