// handlers/customers.rs - customer CRUD and per-customer sales

use axum::extract::State;

use crate::database::models::{Customer, SaleDetail};
use crate::database::repository::SaleFilter;
use crate::database::{CustomerRepository, Page, SaleRepository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ResourceId, ValidJson, ValidQuery};
use crate::state::AppState;
use crate::validation::schemas::{CustomerInput, CustomerPatch, ListQuery};

/// GET /customers?skip=&take=&search=
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Page<Customer>> {
    let page = CustomerRepository::new(&state.pool).list(&query).await?;
    Ok(ApiResponse::success(page))
}

/// GET /customers/:id
pub async fn get(State(state): State<AppState>, ResourceId(id): ResourceId) -> ApiResult<Customer> {
    let customer = CustomerRepository::new(&state.pool)
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Customer not found"))?;
    Ok(ApiResponse::success(customer))
}

/// POST /customers
pub async fn create(
    State(state): State<AppState>,
    auth: Result<AuthUser, ApiError>,
    ValidJson(input): ValidJson<CustomerInput>,
) -> ApiResult<Customer> {
    let user = auth?;
    let customer = CustomerRepository::new(&state.pool)
        .create(&input)
        .await
        .map_err(|e| ApiError::from_db(e, "Invalid customer data"))?;

    tracing::info!(customer_id = customer.id, user_id = user.user_id, "customer created");
    Ok(ApiResponse::created(customer))
}

/// PUT /customers/:id - partial update; `"memo": null` clears the memo
pub async fn update(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    auth: Result<AuthUser, ApiError>,
    ValidJson(patch): ValidJson<CustomerPatch>,
) -> ApiResult<Customer> {
    let user = auth?;
    let customer = CustomerRepository::new(&state.pool)
        .update(id, &patch)
        .await
        .map_err(|e| ApiError::from_db(e, "Customer not found or invalid data"))?;

    tracing::info!(customer_id = id, user_id = user.user_id, "customer updated");
    Ok(ApiResponse::success(customer))
}

/// DELETE /customers/:id
///
/// A customer still referenced by sales is refused by the foreign key and
/// reported as 404 like any other rejected delete.
pub async fn delete(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    user: AuthUser,
) -> ApiResult<()> {
    CustomerRepository::new(&state.pool)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Customer not found"))?;

    tracing::info!(customer_id = id, user_id = user.user_id, "customer deleted");
    Ok(ApiResponse::no_content())
}

/// GET /customers/:id/sales
pub async fn sales(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Page<SaleDetail>> {
    let page = SaleRepository::new(&state.pool)
        .list_details(SaleFilter::customer(id), query.skip, query.take)
        .await?;
    Ok(ApiResponse::success(page))
}
