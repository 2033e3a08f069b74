// handlers/sales.rs - sale CRUD

use axum::extract::State;

use crate::database::models::Sale;
use crate::database::repository::SaleFilter;
use crate::database::{Page, SaleRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ResourceId, ValidJson, ValidQuery};
use crate::state::AppState;
use crate::validation::schemas::{SaleInput, SaleListQuery, SalePatch};

/// GET /sales?skip=&take=&productId=&customerId=
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<SaleListQuery>,
) -> ApiResult<Page<Sale>> {
    let filter = SaleFilter {
        product_id: query.product_id,
        customer_id: query.customer_id,
    };
    let page = SaleRepository::new(&state.pool)
        .list(filter, query.skip, query.take)
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /sales/:id
pub async fn get(State(state): State<AppState>, ResourceId(id): ResourceId) -> ApiResult<Sale> {
    let sale = SaleRepository::new(&state.pool)
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Sale not found"))?;
    Ok(ApiResponse::success(sale))
}

/// POST /sales - `date` accepts `YYYY-MM-DD` or a full timestamp
pub async fn create(
    State(state): State<AppState>,
    auth: Result<AuthUser, ApiError>,
    ValidJson(input): ValidJson<SaleInput>,
) -> ApiResult<Sale> {
    let user = auth?;
    let sale = SaleRepository::new(&state.pool)
        .create(&input)
        .await
        .map_err(|e| ApiError::from_db(e, "Product or customer not found or invalid data"))?;

    tracing::info!(sale_id = sale.id, product_id = sale.product_id, user_id = user.user_id, "sale recorded");
    Ok(ApiResponse::created(sale))
}

/// PUT /sales/:id - partial update; `"customerId": null` detaches the customer
pub async fn update(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    auth: Result<AuthUser, ApiError>,
    ValidJson(patch): ValidJson<SalePatch>,
) -> ApiResult<Sale> {
    let user = auth?;
    let sale = SaleRepository::new(&state.pool)
        .update(id, &patch)
        .await
        .map_err(|e| ApiError::from_db(e, "Sale not found or invalid data"))?;

    tracing::info!(sale_id = id, user_id = user.user_id, "sale updated");
    Ok(ApiResponse::success(sale))
}

/// DELETE /sales/:id
pub async fn delete(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    user: AuthUser,
) -> ApiResult<()> {
    SaleRepository::new(&state.pool)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Sale not found"))?;

    tracing::info!(sale_id = id, user_id = user.user_id, "sale deleted");
    Ok(ApiResponse::no_content())
}
