//! Order routes: list, submit, detail view, staff actions, tasks, comments
//! and the unread notification stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{delete, get, post},
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;

use customer_ops_core::{CommentId, OrderId, OrderStatus, TaskId, TaskStatus, UserId};

use crate::error::AppError;
use crate::middleware::{RequireStaff, RequireUser};
use crate::models::{CreateCommentInput, CreateOrderInput, CreateTaskInput, Order, OrderFilter};
use crate::services::notifications::{subscribe_unread, unread_updates};
use crate::services::{OrderDetail, OrderService};
use crate::state::AppState;

const KEEP_ALIVE_SECONDS: u64 = 15;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/unread", get(unread_count))
        .route("/unread/stream", get(unread_stream))
        .route("/{id}", get(show))
        .route("/{id}/status", post(change_status))
        .route("/{id}/assignment", post(change_assignment))
        .route("/{id}/tasks", post(add_task))
        .route("/{id}/tasks/{task_id}", delete(delete_task))
        .route("/{id}/tasks/{task_id}/status", post(change_task_status))
        .route("/{id}/comments", post(add_comment))
}

/// Query parameters for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Status key, or `all`.
    pub status: Option<String>,
    /// Free-text search over title, customer and summary.
    pub q: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<OrderFilter, AppError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("" | "all") => None,
            Some(raw) => Some(
                raw.parse::<OrderStatus>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            ),
        };
        Ok(OrderFilter {
            status,
            search: self.q.filter(|q| !q.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatusBody<S> {
    status: S,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentBody {
    #[serde(default)]
    assignee_uid: Option<UserId>,
}

#[derive(Debug, Serialize)]
struct Created<T> {
    id: T,
}

async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let filter = query.into_filter()?;
    let orders = OrderService::new(state.store()).list(&user, &filter).await?;
    Ok(Json(orders))
}

#[tracing::instrument(skip(state, user, input), fields(uid = %user.uid))]
async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = OrderService::new(state.store()).create(&user, &input).await?;
    tracing::info!(order_id = %order.id, "Order submitted");
    Ok((StatusCode::CREATED, Json(order)))
}

/// Open the detail view. Staff viewers mark the order viewed.
async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>, AppError> {
    Ok(Json(OrderService::new(state.store()).open(&user, &id).await?))
}

async fn unread_count(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<impl IntoResponse, AppError> {
    let count = OrderService::new(state.store()).unread_count(&staff).await?;
    Ok(Json(json!({ "count": count })))
}

/// Server-sent `unread` events carrying `{count, notify}`.
///
/// The first event is the baseline; `notify` is set at most once per stream,
/// on the first transition from zero to a positive count.
async fn unread_stream(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let subscription = subscribe_unread(state.store()).await?;
    tracing::debug!(uid = %staff.uid, "Opened unread stream");

    let events = unread_updates(subscription).map(|update| {
        let event = Event::default()
            .event("unread")
            .json_data(update)
            .unwrap_or_else(|_| Event::default().event("unread"));
        Ok(event)
    });

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECONDS)),
    ))
}

#[tracing::instrument(skip(state, user, body), fields(uid = %user.uid))]
async fn change_status(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusBody<OrderStatus>>,
) -> Result<impl IntoResponse, AppError> {
    let changed = OrderService::new(state.store())
        .change_status(&user, &id, body.status)
        .await?;
    Ok(Json(json!({ "changed": changed })))
}

#[tracing::instrument(skip(state, user, body), fields(uid = %user.uid))]
async fn change_assignment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
    Json(body): Json<AssignmentBody>,
) -> Result<StatusCode, AppError> {
    OrderService::new(state.store())
        .change_assignment(&user, &id, body.assignee_uid.as_ref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
    Json(input): Json<CreateTaskInput>,
) -> Result<(StatusCode, Json<Created<TaskId>>), AppError> {
    let task_id = OrderService::new(state.store())
        .add_task(&user, &id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id: task_id })))
}

async fn change_task_status(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((id, task_id)): Path<(OrderId, TaskId)>,
    Json(body): Json<StatusBody<TaskStatus>>,
) -> Result<StatusCode, AppError> {
    OrderService::new(state.store())
        .change_task_status(&user, &id, &task_id, body.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((id, task_id)): Path<(OrderId, TaskId)>,
) -> Result<StatusCode, AppError> {
    OrderService::new(state.store())
        .delete_task(&user, &id, &task_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
    Json(input): Json<CreateCommentInput>,
) -> Result<(StatusCode, Json<Created<CommentId>>), AppError> {
    let comment_id = OrderService::new(state.store())
        .add_comment(&user, &id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id: comment_id })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_all_means_no_status_filter() {
        let filter = ListQuery {
            status: Some("all".to_owned()),
            q: Some("  ".to_owned()),
        }
        .into_filter()
        .unwrap();
        assert!(filter.status.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_list_query_parses_status_key() {
        let filter = ListQuery {
            status: Some("in_progress".to_owned()),
            q: Some("spring".to_owned()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.status, Some(OrderStatus::InProgress));
        assert_eq!(filter.search.as_deref(), Some("spring"));
    }

    #[test]
    fn test_list_query_rejects_unknown_status() {
        let err = ListQuery {
            status: Some("shipped".to_owned()),
            q: None,
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
