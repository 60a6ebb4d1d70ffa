//! Order task models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use customer_ops_core::{TaskId, TaskStatus, UserId};

/// A task attached to an order. Tasks nest one level via `parent_task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub parent_task_id: Option<TaskId>,
    pub assignee_uid: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub created_by_uid: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for adding a task to an order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    /// Task title (required, trimmed).
    pub title: String,
    /// Parent task in the same order, for subtasks.
    #[serde(default)]
    pub parent_task_id: Option<TaskId>,
    #[serde(default)]
    pub assignee_uid: Option<UserId>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}
