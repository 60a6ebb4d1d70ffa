//! Home dashboard route.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::services::Dashboard;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(show))
}

async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(Dashboard::load(state.store(), &user).await?))
}
