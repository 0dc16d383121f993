use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    auth::{AuthUser, OptionalAuth},
    error::AppError,
    models::{ArticleBody, ArticleResponse, ArticleUpdate, ArticlesResponse, NewArticle},
    pagination::ListQuery,
    service,
    state::AppState,
};

/// GET /api/articles
pub async fn list(
    State(state): State<Arc<AppState>>,
    viewer: OptionalAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<ArticlesResponse>, AppError> {
    let (articles, articles_count) = service::articles::list(
        &state.db,
        &query.filter(),
        query.page(),
        viewer.viewer(),
    )
    .await?;

    Ok(Json(ArticlesResponse {
        articles,
        articles_count,
    }))
}

/// GET /api/articles/feed
pub async fn feed(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ArticlesResponse>, AppError> {
    let (articles, articles_count) =
        service::articles::feed(&state.db, claims.user_id, query.page()).await?;

    Ok(Json(ArticlesResponse {
        articles,
        articles_count,
    }))
}

/// POST /api/articles
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(body): Json<ArticleBody<NewArticle>>,
) -> Result<(StatusCode, Json<ArticleResponse>), AppError> {
    let article = service::articles::create(&state.db, claims.user_id, body.article).await?;

    Ok((StatusCode::CREATED, Json(ArticleResponse { article })))
}

/// GET /api/articles/{slug}
pub async fn get(
    State(state): State<Arc<AppState>>,
    viewer: OptionalAuth,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = service::articles::get(&state.db, &slug, viewer.viewer()).await?;

    Ok(Json(ArticleResponse { article }))
}

/// PUT /api/articles/{slug}
pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(slug): Path<String>,
    Json(body): Json<ArticleBody<ArticleUpdate>>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = service::articles::update(&state.db, &slug, claims.user_id, body.article).await?;

    Ok(Json(ArticleResponse { article }))
}

/// DELETE /api/articles/{slug}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    service::articles::delete(&state.db, &slug, claims.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/articles/{slug}/favorite
pub async fn favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = service::articles::favorite(&state.db, &slug, claims.user_id).await?;

    Ok(Json(ArticleResponse { article }))
}

/// DELETE /api/articles/{slug}/favorite
pub async fn unfavorite(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = service::articles::unfavorite(&state.db, &slug, claims.user_id).await?;

    Ok(Json(ArticleResponse { article }))
}
