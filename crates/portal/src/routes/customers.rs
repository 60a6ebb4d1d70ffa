//! Customer management routes (staff only).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use customer_ops_core::CustomerId;

use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::models::{CreateCustomerInput, Customer, UpdateCustomerInput, non_empty};
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let needle = query.q.unwrap_or_default();
    let customers = CustomerRepository::new(state.store())
        .list()
        .await?
        .into_iter()
        .filter(|c| c.matches_search(&needle))
        .collect();
    Ok(Json(customers))
}

async fn show(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>, AppError> {
    CustomerRepository::new(state.store())
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))
}

#[tracing::instrument(skip(state, staff, input), fields(uid = %staff.uid))]
async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(input): Json<CreateCustomerInput>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    if non_empty(Some(&input.name)).is_none() {
        return Err(AppError::BadRequest("Name is required".to_owned()));
    }

    let customers = CustomerRepository::new(state.store());
    let id = customers.create(&input).await?;
    let customer = customers
        .get(&id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("customer {id} missing after create")))?;

    tracing::info!(customer_id = %id, "Customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<CustomerId>,
    Json(input): Json<UpdateCustomerInput>,
) -> Result<StatusCode, AppError> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("Name cannot be empty".to_owned()));
    }
    CustomerRepository::new(state.store())
        .update(&id, &input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<CustomerId>,
) -> Result<StatusCode, AppError> {
    CustomerRepository::new(state.store()).delete(&id).await?;
    tracing::info!(customer_id = %id, uid = %staff.uid, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
