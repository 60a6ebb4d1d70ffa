//! HTTP route handlers for the portal JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness
//! GET  /health/ready                        - Store reachability
//!
//! # Auth
//! POST /api/auth/login                      - Sign in
//! POST /api/auth/logout                     - Sign out
//! GET  /api/auth/me                         - Current user
//!
//! # Orders
//! GET  /api/dashboard                       - Home dashboard summary
//! GET  /api/orders?status=&q=               - Order list (role-scoped)
//! POST /api/orders                          - Submit order
//! GET  /api/orders/unread                   - Unread count (staff)
//! GET  /api/orders/unread/stream            - Unread notifications, SSE (staff)
//! GET  /api/orders/{id}                     - Order detail view
//! POST /api/orders/{id}/status              - Change status (staff)
//! POST /api/orders/{id}/assignment          - Change assignment (staff)
//! POST /api/orders/{id}/tasks               - Add task
//! POST /api/orders/{id}/tasks/{task}/status - Change task status
//! DELETE /api/orders/{id}/tasks/{task}      - Delete task
//! POST /api/orders/{id}/comments            - Add comment
//!
//! # Catalogue
//! GET|POST       /api/customers             - List/create customers (staff)
//! PUT|DELETE     /api/customers/{id}        - Update/delete customer (staff)
//! GET|POST       /api/products              - List/create products
//! GET|PUT|DELETE /api/products/{id}         - Get/update/delete product
//! POST           /api/products/{id}/toggle  - Toggle active (staff)
//! GET            /api/production            - Production board (staff)
//! GET|POST       /api/lookbook              - Feed/create post
//! PUT|DELETE     /api/lookbook/{id}         - Update/delete post (staff)
//! GET|POST       /api/lookbook/{id}/comments - List/add post comments
//! ```

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod lookbook;
pub mod orders;
pub mod production;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the complete portal router (health plus `/api`).
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth::router())
        .merge(dashboard::router())
        .nest("/orders", orders::router())
        .nest("/customers", customers::router())
        .nest("/products", products::router())
        .merge(production::router())
        .nest("/lookbook", lookbook::router());

    Router::new()
        .merge(health::router())
        .nest("/api", api)
}
