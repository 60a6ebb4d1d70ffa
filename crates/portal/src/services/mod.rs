//! Business logic on top of the repositories.
//!
//! Services take the signed-in [`CurrentUser`](crate::models::CurrentUser)
//! explicitly and enforce role checks themselves, so the same rules apply to
//! HTTP handlers, the CLI and tests.

pub mod auth;
pub mod dashboard;
pub mod lookbook;
pub mod notifications;
pub mod order_detail;
pub mod orders;
pub mod production;

pub use auth::{AuthError, AuthService, NewUser, SessionContext};
pub use dashboard::Dashboard;
pub use lookbook::LookbookFeed;
pub use notifications::{UnreadTracker, UnreadUpdate};
pub use order_detail::OrderDetail;
pub use orders::{OrderError, OrderService};
pub use production::ProductionBoard;
