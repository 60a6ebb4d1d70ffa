//! HTTP middleware for the portal.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors and transactions)
//! 2. `TraceLayer` (per-request span with status and latency)
//! 3. Request ID (recorded on the span, echoed as `x-request-id`)
//! 4. Response headers (`nosniff`, `no-store`)
//! 5. Session layer (tower-sessions, `PostgreSQL` or in-memory store)
//!
//! Authentication is enforced per handler with the extractors in [`auth`].

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    AuthRejection, OptionalUser, RequireStaff, RequireUser, clear_current_user, set_current_user,
};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, SessionLayer, create_session_layer};
