//! Lookbook routes: the feed, staff publishing, and post comments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;

use customer_ops_core::{LookbookPostId, LookbookPostType};

use crate::db::LookbookRepository;
use crate::error::AppError;
use crate::middleware::{RequireStaff, RequireUser};
use crate::models::{
    CreateLookbookCommentInput, LookbookComment, LookbookPost, LookbookPostInput,
    UpdateLookbookPostInput, non_empty,
};
use crate::services::LookbookFeed;
use crate::state::AppState;

/// Build the lookbook router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(feed).post(create))
        .route("/{id}", put(update).delete(remove))
        .route("/{id}/comments", get(list_comments).post(add_comment))
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Post type key, or `all`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn parse_kind(raw: Option<&str>) -> Result<Option<LookbookPostType>, AppError> {
    match raw.map(str::trim) {
        None | Some("" | "all") => Ok(None),
        Some(raw) => raw
            .parse::<LookbookPostType>()
            .map(Some)
            .map_err(|e| AppError::BadRequest(e.to_string())),
    }
}

async fn feed(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<LookbookFeed>, AppError> {
    let kind = parse_kind(query.kind.as_deref())?;
    let posts = LookbookRepository::new(state.store()).list().await?;
    Ok(Json(LookbookFeed::build(posts, kind)))
}

#[tracing::instrument(skip(state, staff, input), fields(uid = %staff.uid))]
async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(input): Json<LookbookPostInput>,
) -> Result<(StatusCode, Json<LookbookPost>), AppError> {
    if non_empty(Some(&input.title)).is_none() {
        return Err(AppError::BadRequest("Title is required".to_owned()));
    }

    let lookbook = LookbookRepository::new(state.store());
    let id = lookbook.create(&input).await?;
    let post = lookbook
        .get(&id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("post {id} missing after create")))?;

    tracing::info!(post_id = %id, kind = post.kind.as_str(), "Lookbook post published");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<LookbookPostId>,
    Json(input): Json<UpdateLookbookPostInput>,
) -> Result<StatusCode, AppError> {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest("Title cannot be empty".to_owned()));
    }
    LookbookRepository::new(state.store())
        .update(&id, &input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<LookbookPostId>,
) -> Result<StatusCode, AppError> {
    LookbookRepository::new(state.store()).delete(&id).await?;
    tracing::info!(post_id = %id, uid = %staff.uid, "Lookbook post deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_comments(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Path(id): Path<LookbookPostId>,
) -> Result<Json<Vec<LookbookComment>>, AppError> {
    Ok(Json(
        LookbookRepository::new(state.store())
            .list_comments(&id)
            .await?,
    ))
}

async fn add_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<LookbookPostId>,
    Json(input): Json<CreateLookbookCommentInput>,
) -> Result<(StatusCode, Json<LookbookComment>), AppError> {
    let message = non_empty(Some(&input.message))
        .ok_or_else(|| AppError::BadRequest("Message is required".to_owned()))?;

    let lookbook = LookbookRepository::new(state.store());
    if lookbook.get(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("lookbook post {id}")));
    }

    let comment_id = lookbook
        .add_comment(&id, &message, &user.uid, &user.name)
        .await?;
    let comment = LookbookComment {
        id: comment_id,
        message,
        created_by_uid: Some(user.uid),
        created_by_name: user.name,
        created_at: None,
    };
    Ok((StatusCode::CREATED, Json(comment)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind(None).unwrap(), None);
        assert_eq!(parse_kind(Some("all")).unwrap(), None);
        assert_eq!(
            parse_kind(Some("campaign")).unwrap(),
            Some(LookbookPostType::Campaign)
        );
        assert!(matches!(
            parse_kind(Some("podcast")),
            Err(AppError::BadRequest(_))
        ));
    }
}
