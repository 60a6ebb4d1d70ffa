//! Order comment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use customer_ops_core::{CommentId, UserId};

/// A comment on an order. Replies reference their parent via `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    #[serde(default)]
    pub message: String,
    pub created_by_uid: Option<UserId>,
    #[serde(default)]
    pub created_by_name: String,
    pub parent_id: Option<CommentId>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Whether this comment is a reply to another comment.
    #[must_use]
    pub const fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Input for posting a comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    /// Comment body (required, trimmed).
    pub message: String,
    /// Comment being replied to, in the same order.
    #[serde(default)]
    pub parent_id: Option<CommentId>,
}
