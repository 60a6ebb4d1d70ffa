//! Order timeline (audit) entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use customer_ops_core::{TimelineEntryId, TimelineKind, UserId};

/// An append-only record of a change to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: TimelineEntryId,
    /// Stored as `type`.
    #[serde(rename = "type")]
    pub kind: TimelineKind,
    #[serde(default)]
    pub message: String,
    pub created_by_uid: Option<UserId>,
    pub created_by_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
