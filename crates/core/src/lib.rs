//! Customer Ops Core - Shared types library.
//!
//! This crate provides common types used across all customer ops components:
//! - `portal` - Order, catalogue and production portal (library + HTTP binary)
//! - `cli` - Command-line tools for migrations, seeding and staff management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no document store
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document IDs, prices, emails, statuses and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
