//! Domain models for the portal.
//!
//! Models mirror the documents in the store. Field names serialize as
//! camelCase, which is both the stored form and the JSON API form.

pub mod comment;
pub mod customer;
pub mod lookbook;
pub mod order;
pub mod product;
pub mod session;
pub mod task;
pub mod timeline;
pub mod user;

pub use comment::{Comment, CreateCommentInput};
pub use customer::{CreateCustomerInput, Customer, UpdateCustomerInput};
pub use lookbook::{
    CreateLookbookCommentInput, LookbookComment, LookbookPost, LookbookPostInput,
    UpdateLookbookPostInput,
};
pub use order::{CreateOrderInput, Order, OrderFilter};
pub use product::{CreateProductInput, Product, UpdateProductInput};
pub use session::{CurrentUser, keys as session_keys};
pub use task::{CreateTaskInput, Task};
pub use timeline::TimelineEntry;
pub use user::{Credential, UserProfile};

/// Trim a free-text field and treat whitespace-only input as absent.
#[must_use]
pub fn non_empty(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  hi ")), Some("hi".to_owned()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
