//! Order service: listing, submission, the detail view, and staff actions.
//!
//! Writes are sequential with no rollback. Status and assignment changes
//! update the order first and then append one timeline entry; if that second
//! write fails the change stands and the failure is only logged.

use thiserror::Error;

use customer_ops_core::{
    CommentId, OrderId, OrderStatus, TaskId, TaskStatus, TimelineKind, UserId,
};

use super::order_detail::OrderDetail;
use crate::db::orders::NewOrder;
use crate::db::tasks::NewTask;
use crate::db::{CommentRepository, OrderRepository, TaskRepository, UserRepository};
use crate::models::{
    CreateCommentInput, CreateOrderInput, CreateTaskInput, CurrentUser, Order, OrderFilter,
    non_empty,
};
use crate::store::{DocumentStore, StoreError};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order (or a task within it) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller may not perform this action.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Document store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Order operations on behalf of a signed-in user.
pub struct OrderService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    const fn orders(&self) -> OrderRepository<'a> {
        OrderRepository::new(self.store)
    }

    // =========================================================================
    // Listing and submission
    // =========================================================================

    /// Orders visible to `viewer`, newest first, filtered.
    ///
    /// Staff see every order; customers see only their own account's orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Store` if the query fails.
    #[tracing::instrument(skip(self, viewer, filter), fields(uid = %viewer.uid))]
    pub async fn list(
        &self,
        viewer: &CurrentUser,
        filter: &OrderFilter,
    ) -> Result<Vec<Order>, OrderError> {
        let orders = if viewer.is_staff() {
            self.orders().list(None).await?
        } else if let Some(customer) = &viewer.customer_id {
            self.orders().list(Some(customer)).await?
        } else {
            Vec::new()
        };
        Ok(orders.into_iter().filter(|o| filter.accepts(o)).collect())
    }

    /// Submit a new order and record it on the timeline.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` if the title or customer is missing.
    /// Returns `OrderError::Store` if the order cannot be written.
    #[tracing::instrument(skip(self, viewer, input), fields(uid = %viewer.uid))]
    pub async fn create(
        &self,
        viewer: &CurrentUser,
        input: &CreateOrderInput,
    ) -> Result<Order, OrderError> {
        let title = non_empty(Some(&input.title))
            .ok_or_else(|| OrderError::Validation("Title is required".to_owned()))?;

        let customer_id = if viewer.is_staff() {
            input
                .customer_id
                .as_ref()
                .filter(|c| !c.as_str().trim().is_empty())
                .cloned()
                .ok_or_else(|| OrderError::Validation("Customer is required".to_owned()))?
        } else {
            viewer.customer_id.clone().ok_or_else(|| {
                OrderError::Validation("Your account is not linked to a customer".to_owned())
            })?
        };

        let new_order = NewOrder {
            title,
            summary: non_empty(input.summary.as_deref()).unwrap_or_default(),
            customer_id,
            delivery_date: input.delivery_date,
            created_by_uid: viewer.uid.clone(),
        };
        let id = self.orders().create(&new_order).await?;
        tracing::info!(order_id = %id, customer_id = %new_order.customer_id, "Order submitted");

        self.audit(&id, TimelineKind::Created, "Order submitted", viewer)
            .await;

        self.orders()
            .get(&id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    // =========================================================================
    // Detail view
    // =========================================================================

    /// Fetch and assemble the detail view.
    ///
    /// The order, tasks, comments, timeline and staff directory are fetched
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist.
    /// Returns `OrderError::Forbidden` if a customer opens another account's order.
    #[tracing::instrument(skip(self, viewer), fields(uid = %viewer.uid))]
    pub async fn load_detail(
        &self,
        viewer: &CurrentUser,
        id: &OrderId,
    ) -> Result<OrderDetail, OrderError> {
        let orders = self.orders();
        let tasks = TaskRepository::new(self.store, id);
        let comments = CommentRepository::new(self.store, id);
        let users = UserRepository::new(self.store);
        let staff = async {
            if viewer.is_staff() {
                users.list_staff().await
            } else {
                Ok(Vec::new())
            }
        };

        let (order, tasks, comments, timeline, staff) = tokio::try_join!(
            orders.get(id),
            tasks.list(),
            comments.list(),
            orders.list_updates(id),
            staff,
        )?;

        let order = order.ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        ensure_access(viewer, &order)?;
        Ok(OrderDetail::assemble(order, tasks, comments, timeline, staff))
    }

    /// Open the detail view. Staff opening an unviewed order marks it viewed.
    ///
    /// # Errors
    ///
    /// Same as [`OrderService::load_detail`].
    pub async fn open(&self, viewer: &CurrentUser, id: &OrderId) -> Result<OrderDetail, OrderError> {
        let mut detail = self.load_detail(viewer, id).await?;
        if viewer.is_staff() && !detail.order.viewed {
            self.orders().mark_viewed(id).await?;
            detail.order.viewed = true;
        }
        Ok(detail)
    }

    /// Mark an order as viewed by staff.
    ///
    /// Returns whether the flag changed. Non-staff viewers and already viewed
    /// orders are no-ops. Never writes a timeline entry.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist.
    pub async fn mark_viewed(&self, viewer: &CurrentUser, id: &OrderId) -> Result<bool, OrderError> {
        if !viewer.is_staff() {
            return Ok(false);
        }
        let order = self.require_order(id).await?;
        if order.viewed {
            return Ok(false);
        }
        self.orders().mark_viewed(id).await?;
        Ok(true)
    }

    /// Number of orders staff have not opened yet.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Forbidden` for non-staff viewers.
    pub async fn unread_count(&self, viewer: &CurrentUser) -> Result<usize, OrderError> {
        require_staff(viewer)?;
        Ok(self.orders().count_unviewed().await?)
    }

    // =========================================================================
    // Staff actions
    // =========================================================================

    /// Change an order's status and record it on the timeline.
    ///
    /// Returns `false` without writing anything if the order is already in
    /// `status`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Forbidden` if the actor is not staff.
    /// Returns `OrderError::NotFound` if the order does not exist.
    #[tracing::instrument(skip(self, actor), fields(uid = %actor.uid))]
    pub async fn change_status(
        &self,
        actor: &CurrentUser,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<bool, OrderError> {
        require_staff(actor)?;
        let order = self.require_order(id).await?;
        if order.status == status {
            return Ok(false);
        }

        self.orders().update_status(id, status).await?;
        let message = format!("Status changed to {}", status.label());
        self.audit(id, TimelineKind::StatusChange, &message, actor)
            .await;
        tracing::info!(order_id = %id, from = %order.status, to = %status, "Order status changed");
        Ok(true)
    }

    /// Assign the order to a staff member, or clear the assignment.
    ///
    /// A blank uid clears the assignment.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Forbidden` if the actor is not staff.
    /// Returns `OrderError::NotFound` if the order does not exist.
    #[tracing::instrument(skip(self, actor), fields(uid = %actor.uid))]
    pub async fn change_assignment(
        &self,
        actor: &CurrentUser,
        id: &OrderId,
        assignee: Option<&UserId>,
    ) -> Result<(), OrderError> {
        require_staff(actor)?;
        self.require_order(id).await?;

        // The picker's "Unassigned" option posts an empty uid.
        let assignee = assignee.filter(|uid| !uid.as_str().trim().is_empty());
        let message = match assignee {
            Some(uid) => {
                let staff = UserRepository::new(self.store).list_staff().await?;
                let name = staff
                    .iter()
                    .find(|s| &s.id == uid)
                    .map_or("Unassigned", |s| s.display_name());
                format!("Assigned to {name}")
            }
            None => "Unassigned".to_owned(),
        };

        self.orders().update_assignment(id, assignee).await?;
        self.audit(id, TimelineKind::Assignment, &message, actor)
            .await;
        Ok(())
    }

    // =========================================================================
    // Tasks and comments
    // =========================================================================

    /// Add a task (or subtask) to an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty title or a parent task
    /// outside this order.
    pub async fn add_task(
        &self,
        actor: &CurrentUser,
        order_id: &OrderId,
        input: &CreateTaskInput,
    ) -> Result<TaskId, OrderError> {
        let order = self.require_order(order_id).await?;
        ensure_access(actor, &order)?;

        let title = non_empty(Some(&input.title))
            .ok_or_else(|| OrderError::Validation("Task title is required".to_owned()))?;

        let tasks = TaskRepository::new(self.store, order_id);
        if let Some(parent) = &input.parent_task_id
            && tasks.get(parent).await?.is_none()
        {
            return Err(OrderError::Validation(format!(
                "Parent task {parent} is not part of this order"
            )));
        }

        let id = tasks
            .create(&NewTask {
                title,
                parent_task_id: input.parent_task_id.clone(),
                assignee_uid: input.assignee_uid.clone(),
                due_date: input.due_date,
                created_by_uid: actor.uid.clone(),
            })
            .await?;
        Ok(id)
    }

    /// Change a task's status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order or task does not exist.
    pub async fn change_task_status(
        &self,
        actor: &CurrentUser,
        order_id: &OrderId,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<(), OrderError> {
        let order = self.require_order(order_id).await?;
        ensure_access(actor, &order)?;
        TaskRepository::new(self.store, order_id)
            .update_status(task_id, status)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => OrderError::NotFound(task_id.to_string()),
                other => OrderError::Store(other),
            })
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist.
    pub async fn delete_task(
        &self,
        actor: &CurrentUser,
        order_id: &OrderId,
        task_id: &TaskId,
    ) -> Result<(), OrderError> {
        let order = self.require_order(order_id).await?;
        ensure_access(actor, &order)?;
        TaskRepository::new(self.store, order_id)
            .delete(task_id)
            .await?;
        Ok(())
    }

    /// Post a comment (or reply) on an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty message or a parent
    /// comment outside this order.
    pub async fn add_comment(
        &self,
        actor: &CurrentUser,
        order_id: &OrderId,
        input: &CreateCommentInput,
    ) -> Result<CommentId, OrderError> {
        let order = self.require_order(order_id).await?;
        ensure_access(actor, &order)?;

        let message = non_empty(Some(&input.message))
            .ok_or_else(|| OrderError::Validation("Comment cannot be empty".to_owned()))?;

        let comments = CommentRepository::new(self.store, order_id);
        if let Some(parent) = &input.parent_id
            && !comments.exists(parent).await?
        {
            return Err(OrderError::Validation(format!(
                "Comment {parent} is not part of this order"
            )));
        }

        let id = comments
            .create(&message, &actor.uid, &actor.name, input.parent_id.as_ref())
            .await?;
        Ok(id)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn require_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.orders()
            .get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    async fn audit(&self, id: &OrderId, kind: TimelineKind, message: &str, actor: &CurrentUser) {
        if let Err(e) = self
            .orders()
            .append_update(id, kind, message, &actor.uid, Some(&actor.name))
            .await
        {
            tracing::warn!(
                order_id = %id,
                kind = %kind,
                error = %e,
                "Failed to append order timeline entry"
            );
        }
    }
}

fn require_staff(user: &CurrentUser) -> Result<(), OrderError> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(OrderError::Forbidden("Only staff can perform this action"))
    }
}

fn ensure_access(viewer: &CurrentUser, order: &Order) -> Result<(), OrderError> {
    if viewer.is_staff()
        || (viewer.customer_id.is_some() && viewer.customer_id == order.customer_id)
    {
        Ok(())
    } else {
        Err(OrderError::Forbidden("This order belongs to another customer"))
    }
}
