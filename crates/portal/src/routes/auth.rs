//! Sign-in, sign-out and current-user routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Sign-in request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign in with email and password.
#[tracing::instrument(skip(state, session, body), fields(email = %body.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<CurrentUser>, AppError> {
    let user = AuthService::new(state.store())
        .sign_in(&body.email, &body.password)
        .await
        .map_err(|e| {
            if !matches!(e, AuthError::InvalidEmail(_) | AuthError::InvalidCredentials) {
                tracing::error!(error = %e, "Sign-in failed");
            }
            AppError::Unauthorized(e.user_message().to_owned())
        })?;

    set_current_user(&session, &user).await?;
    set_sentry_user(user.uid.as_str(), Some(&user.email));
    tracing::info!(uid = %user.uid, role = %user.role, "Signed in");

    Ok(Json(user))
}

/// Sign out and discard the session.
async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user.
async fn me(RequireUser(user): RequireUser) -> Json<CurrentUser> {
    Json(user)
}
