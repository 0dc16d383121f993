use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    auth::{AuthUser, OptionalAuth},
    error::AppError,
    models::{CommentBody, CommentResponse, CommentsResponse, NewComment},
    service,
    state::AppState,
};

/// GET /api/articles/{slug}/comments
pub async fn list(
    State(state): State<Arc<AppState>>,
    viewer: OptionalAuth,
    Path(slug): Path<String>,
) -> Result<Json<CommentsResponse>, AppError> {
    let comments = service::comments::list(&state.db, &slug, viewer.viewer()).await?;

    Ok(Json(CommentsResponse { comments }))
}

/// POST /api/articles/{slug}/comments
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<CommentBody<NewComment>>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment =
        service::comments::create(&state.db, &slug, claims.user_id, &body.comment.body).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

/// DELETE /api/articles/{slug}/comments/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((_slug, id)): Path<(String, i64)>,
) -> Result<StatusCode, AppError> {
    service::comments::delete(&state.db, id, claims.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
