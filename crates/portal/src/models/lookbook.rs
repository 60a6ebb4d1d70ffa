//! Lookbook feed models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use customer_ops_core::{LookbookCommentId, LookbookPostId, LookbookPostType, UserId};

/// A post on the lookbook feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookbookPost {
    pub id: LookbookPostId,
    /// Stored as `type`.
    #[serde(rename = "type", default)]
    pub kind: LookbookPostType,
    #[serde(default)]
    pub title: String,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Hero image.
    pub image_url: Option<String>,
    /// Gallery images.
    #[serde(default)]
    pub images: Vec<String>,
    /// Display date, free text (e.g. "January 15, 2025").
    pub date: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a lookbook post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookbookPostInput {
    #[serde(rename = "type", default)]
    pub kind: LookbookPostType,
    /// Post title (required, trimmed).
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Input for updating a lookbook post. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLookbookPostInput {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LookbookPostType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// A comment under a lookbook post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookbookComment {
    pub id: LookbookCommentId,
    #[serde(default)]
    pub message: String,
    pub created_by_uid: Option<UserId>,
    #[serde(default)]
    pub created_by_name: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for commenting on a lookbook post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLookbookCommentInput {
    pub message: String,
}
