//! Status enums for orders, tasks, timeline entries and lookbook posts.
//!
//! All enums serialize as `snake_case` strings, which is also the form stored
//! in the document store and accepted by `FromStr`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct InvalidStatus {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Lifecycle status of a customer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Submitted,
    Confirmed,
    InProgress,
    Delivered,
    Closed,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Submitted,
        Self::Confirmed,
        Self::InProgress,
        Self::Delivered,
        Self::Closed,
        Self::Cancelled,
    ];

    /// Columns shown on the production pipeline board.
    pub const PIPELINE: [Self; 4] = [
        Self::Submitted,
        Self::Confirmed,
        Self::InProgress,
        Self::Delivered,
    ];

    /// The stored `snake_case` form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Delivered => "delivered",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label (underscores replaced by spaces).
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Whether the order still needs work (not closed or cancelled).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Whether the order occupies production capacity.
    #[must_use]
    pub const fn uses_capacity(&self) -> bool {
        matches!(self, Self::Confirmed | Self::InProgress)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus {
                kind: "order status",
                value: s.to_owned(),
            })
    }
}

/// Status of a task attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Blocked,
    Done,
}

impl TaskStatus {
    /// Every task status, in board order.
    pub const ALL: [Self; 4] = [Self::Todo, Self::Doing, Self::Blocked, Self::Done];

    /// The stored `snake_case` form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Blocked => "blocked",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus {
                kind: "task status",
                value: s.to_owned(),
            })
    }
}

/// Type tag of an order timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    /// The order was submitted.
    Created,
    /// The order status changed.
    StatusChange,
    /// The assigned staff member changed.
    Assignment,
}

impl TimelineKind {
    /// The stored `snake_case` form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChange => "status_change",
            Self::Assignment => "assignment",
        }
    }
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of lookbook post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LookbookPostType {
    Campaign,
    #[default]
    News,
    Photoshoot,
    Update,
    Catalogue,
}

impl LookbookPostType {
    /// Every post type, in filter-bar order.
    pub const ALL: [Self; 5] = [
        Self::News,
        Self::Update,
        Self::Campaign,
        Self::Photoshoot,
        Self::Catalogue,
    ];

    /// The stored `snake_case` form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Campaign => "campaign",
            Self::News => "news",
            Self::Photoshoot => "photoshoot",
            Self::Update => "update",
            Self::Catalogue => "catalogue",
        }
    }

    /// Display label used on the lookbook feed.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Campaign => "Campaign",
            Self::News => "News",
            Self::Photoshoot => "Behind the Scenes",
            Self::Update => "Update",
            Self::Catalogue => "Lookbook",
        }
    }
}

impl std::str::FromStr for LookbookPostType {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| InvalidStatus {
                kind: "lookbook post type",
                value: s.to_owned(),
            })
    }
}
