//! Repositories over the document store.
//!
//! # Collections
//!
//! - `orders` - customer orders
//! - `orders/{id}/tasks` - tasks and subtasks of an order
//! - `orders/{id}/comments` - threaded order comments
//! - `orders/{id}/updates` - append-only order timeline
//! - `customers` - customer accounts
//! - `products` - catalogue products
//! - `users` - user profiles keyed by user ID
//! - `credentials` - password hashes keyed by user ID
//! - `lookbook` and `lookbook/{id}/comments` - content feed
//!
//! Repositories borrow the store for the duration of a call and stamp
//! `createdAt`/`updatedAt` themselves.

pub mod comments;
pub mod customers;
pub mod lookbook;
pub mod orders;
pub mod products;
pub mod tasks;
pub mod users;

use serde_json::Value;

pub use comments::CommentRepository;
pub use customers::CustomerRepository;
pub use lookbook::LookbookRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use tasks::TaskRepository;
pub use users::UserRepository;

use crate::store::{CollectionPath, Fields, StoreError, encode};

pub const ORDERS: &str = "orders";
pub const TASKS: &str = "tasks";
pub const COMMENTS: &str = "comments";
pub const UPDATES: &str = "updates";
pub const CUSTOMERS: &str = "customers";
pub const PRODUCTS: &str = "products";
pub const USERS: &str = "users";
pub const CREDENTIALS: &str = "credentials";
pub const LOOKBOOK: &str = "lookbook";

/// Sub-collection `orders/{order_id}/{name}`.
fn order_child(order_id: &str, name: &str) -> CollectionPath {
    CollectionPath::root(ORDERS).child(order_id, name)
}

/// Build a patch from a JSON object literal.
fn patch(value: &Value) -> Result<Fields, StoreError> {
    encode(value)
}
