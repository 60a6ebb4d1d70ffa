//! Order task repository.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;

use customer_ops_core::{OrderId, TaskId, TaskStatus, UserId};

use super::{TASKS, order_child, patch};
use crate::models::Task;
use crate::store::{CollectionPath, Direction, DocumentStore, Query, StoreError, decode_all, encode};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskDocument<'a> {
    title: &'a str,
    status: TaskStatus,
    parent_task_id: Option<&'a TaskId>,
    assignee_uid: Option<&'a UserId>,
    due_date: Option<NaiveDate>,
    created_by_uid: &'a UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A validated task ready to be written.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub parent_task_id: Option<TaskId>,
    pub assignee_uid: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub created_by_uid: UserId,
}

/// Repository for the tasks of one order.
pub struct TaskRepository<'a> {
    store: &'a dyn DocumentStore,
    collection: CollectionPath,
}

impl<'a> TaskRepository<'a> {
    /// Create a repository scoped to `order_id`.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, order_id: &OrderId) -> Self {
        Self {
            store,
            collection: order_child(order_id.as_str(), TASKS),
        }
    }

    /// All tasks of the order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails or a document is malformed.
    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let query =
            Query::collection(self.collection.clone()).order_by("createdAt", Direction::Ascending);
        decode_all(&self.store.query(&query).await?)
    }

    /// Get one task.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the read fails or the document is malformed.
    pub async fn get(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        self.store
            .get(&self.collection, id.as_str())
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Add a task in `todo` status.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn create(&self, task: &NewTask) -> Result<TaskId, StoreError> {
        let now = Utc::now();
        let doc = TaskDocument {
            title: &task.title,
            status: TaskStatus::Todo,
            parent_task_id: task.parent_task_id.as_ref(),
            assignee_uid: task.assignee_uid.as_ref(),
            due_date: task.due_date,
            created_by_uid: &task.created_by_uid,
            created_at: now,
            updated_at: now,
        };
        let id = self.store.add(&self.collection, encode(&doc)?).await?;
        Ok(TaskId::new(id))
    }

    /// Change a task's status.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the task does not exist.
    pub async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError> {
        let fields = patch(&json!({ "status": status, "updatedAt": Utc::now() }))?;
        self.store.update(&self.collection, id.as_str(), fields).await
    }

    /// Delete a task. Its subtasks are left in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub async fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        self.store.delete(&self.collection, id.as_str()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn new_task(title: &str, parent: Option<&TaskId>) -> NewTask {
        NewTask {
            title: title.to_owned(),
            parent_task_id: parent.cloned(),
            assignee_uid: None,
            due_date: None,
            created_by_uid: UserId::new("s1"),
        }
    }

    #[tokio::test]
    async fn test_tasks_are_scoped_to_their_order() {
        let store = MemoryStore::new();
        let a = TaskRepository::new(&store, &OrderId::new("a"));
        let b = TaskRepository::new(&store, &OrderId::new("b"));

        let id = a.create(&new_task("Cut fabric", None)).await.unwrap();
        assert!(b.get(&id).await.unwrap().is_none());
        assert_eq!(a.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_new_task_is_todo_and_status_changes() {
        let store = MemoryStore::new();
        let repo = TaskRepository::new(&store, &OrderId::new("a"));
        let parent = repo.create(&new_task("Parent", None)).await.unwrap();
        let child = repo.create(&new_task("Child", Some(&parent))).await.unwrap();

        let task = repo.get(&child).await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.parent_task_id, Some(parent));

        repo.update_status(&child, TaskStatus::Done).await.unwrap();
        assert_eq!(
            repo.get(&child).await.unwrap().unwrap().status,
            TaskStatus::Done
        );

        repo.delete(&child).await.unwrap();
        assert!(repo.get(&child).await.unwrap().is_none());
    }
}
