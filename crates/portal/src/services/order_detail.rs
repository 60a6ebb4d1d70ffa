//! Order detail view model.
//!
//! Joins an order with its tasks, comments, timeline and (for staff) the staff
//! directory. Everything here is derived: the view is rebuilt from fresh
//! fetches on every load and never patched incrementally.
//!
//! Comment threading and task grouping are both exactly one level deep. A
//! reply to a reply, or a subtask of a subtask, is not attached anywhere and
//! so does not appear in the rendered tree.

use std::collections::BTreeMap;

use serde::Serialize;

use customer_ops_core::{TaskId, TaskStatus};

use crate::models::{Comment, Order, Task, TimelineEntry, UserProfile};

/// A top-level comment with its direct replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Tasks split into parents and one level of subtasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedTasks {
    /// Tasks without a parent, in store order.
    pub parents: Vec<Task>,
    /// Subtasks keyed by the ID of the task they reference.
    pub subtasks: BTreeMap<TaskId, Vec<Task>>,
}

impl GroupedTasks {
    /// Subtasks of one parent (empty if none).
    #[must_use]
    pub fn subtasks_of(&self, parent: &TaskId) -> &[Task] {
        self.subtasks.get(parent).map(Vec::as_slice).unwrap_or_default()
    }

    /// Tasks that will actually be displayed: parents plus subtasks whose
    /// parent is a displayed parent.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.parents.len()
            + self
                .parents
                .iter()
                .map(|p| self.subtasks_of(&p.id).len())
                .sum::<usize>()
    }
}

/// Per-status task counts over every task of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub todo: usize,
    pub doing: usize,
    pub blocked: usize,
    pub done: usize,
    pub total: usize,
}

impl TaskCounts {
    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::Doing => self.doing,
            TaskStatus::Blocked => self.blocked,
            TaskStatus::Done => self.done,
        }
    }
}

/// Everything the order detail screen shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order: Order,
    pub tasks: GroupedTasks,
    pub task_counts: TaskCounts,
    pub comments: Vec<CommentThread>,
    /// Newest first.
    pub timeline: Vec<TimelineEntry>,
    /// Assignment choices; empty unless the viewer is staff.
    pub staff: Vec<UserProfile>,
}

impl OrderDetail {
    /// Assemble the view from independently fetched collections.
    #[must_use]
    pub fn assemble(
        order: Order,
        tasks: Vec<Task>,
        comments: Vec<Comment>,
        timeline: Vec<TimelineEntry>,
        staff: Vec<UserProfile>,
    ) -> Self {
        let task_counts = count_tasks(&tasks);
        Self {
            order,
            tasks: group_tasks(tasks),
            task_counts,
            comments: thread_comments(comments),
            timeline,
            staff,
        }
    }
}

/// Attach each reply to its top-level parent.
///
/// Replies whose parent is itself a reply (or missing) are dropped.
#[must_use]
pub fn thread_comments(comments: Vec<Comment>) -> Vec<CommentThread> {
    let (top, replies): (Vec<Comment>, Vec<Comment>) =
        comments.into_iter().partition(|c| !c.is_reply());

    top.into_iter()
        .map(|comment| {
            let replies = replies
                .iter()
                .filter(|r| r.parent_id.as_ref() == Some(&comment.id))
                .cloned()
                .collect();
            CommentThread { comment, replies }
        })
        .collect()
}

/// Split tasks into parents and a subtask map keyed by parent ID.
#[must_use]
pub fn group_tasks(tasks: Vec<Task>) -> GroupedTasks {
    let mut grouped = GroupedTasks::default();
    for task in tasks {
        match task.parent_task_id.clone() {
            None => grouped.parents.push(task),
            Some(parent) => grouped.subtasks.entry(parent).or_default().push(task),
        }
    }
    grouped
}

/// Count tasks by status. Every status is present, defaulting to zero.
#[must_use]
pub fn count_tasks(tasks: &[Task]) -> TaskCounts {
    tasks.iter().fold(TaskCounts::default(), |mut counts, task| {
        match task.status {
            TaskStatus::Todo => counts.todo += 1,
            TaskStatus::Doing => counts.doing += 1,
            TaskStatus::Blocked => counts.blocked += 1,
            TaskStatus::Done => counts.done += 1,
        }
        counts.total += 1;
        counts
    })
}
