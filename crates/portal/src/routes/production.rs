//! Production board route.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::services::ProductionBoard;
use crate::state::AppState;

/// Build the production router.
pub fn router() -> Router<AppState> {
    Router::new().route("/production", get(show))
}

async fn show(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
) -> Result<Json<ProductionBoard>, AppError> {
    let orders = OrderRepository::new(state.store()).list(None).await?;
    let today = Utc::now().date_naive();
    Ok(Json(ProductionBoard::build(&orders, today)))
}
