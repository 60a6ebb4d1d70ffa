//! Product catalogue routes.
//!
//! Any signed-in user may browse; only staff may edit. Customers only ever
//! see active products.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use customer_ops_core::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::{RequireStaff, RequireUser};
use crate::models::{CreateProductInput, Product, UpdateProductInput, non_empty};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/toggle", post(toggle))
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogueQuery {
    /// Only return active products. Ignored for customers, who always get
    /// active products only.
    #[serde(default)]
    pub active: Option<bool>,
    pub q: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<CatalogueQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let only_active = !user.is_staff() || query.active.unwrap_or(false);
    let needle = query.q.unwrap_or_default();
    let products = ProductRepository::new(state.store())
        .list(only_active)
        .await?
        .into_iter()
        .filter(|p| p.matches_search(&needle))
        .collect();
    Ok(Json(products))
}

async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    ProductRepository::new(state.store())
        .get(&id)
        .await?
        .filter(|p| p.active || user.is_staff())
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

#[tracing::instrument(skip(state, staff, input), fields(uid = %staff.uid))]
async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    if non_empty(Some(&input.name)).is_none() {
        return Err(AppError::BadRequest("Name is required".to_owned()));
    }

    let products = ProductRepository::new(state.store());
    let id = products.create(&input).await?;
    let product = products
        .get(&id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("product {id} missing after create")))?;

    tracing::info!(product_id = %id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> Result<StatusCode, AppError> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("Name cannot be empty".to_owned()));
    }
    ProductRepository::new(state.store())
        .update(&id, &input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>, AppError> {
    let active = ProductRepository::new(state.store())
        .toggle_active(&id)
        .await?;
    Ok(Json(json!({ "active": active })))
}

async fn remove(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    ProductRepository::new(state.store()).delete(&id).await?;
    tracing::info!(product_id = %id, uid = %staff.uid, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
