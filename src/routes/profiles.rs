use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    auth::{AuthUser, OptionalAuth},
    error::AppError,
    models::ProfileResponse,
    service,
    state::AppState,
};

/// GET /api/profiles/{username}
pub async fn get(
    State(state): State<Arc<AppState>>,
    viewer: OptionalAuth,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = service::profiles::get(&state.db, &username, viewer.viewer()).await?;

    Ok(Json(ProfileResponse { profile }))
}

/// POST /api/profiles/{username}/follow
pub async fn follow(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = service::profiles::follow(&state.db, claims.user_id, &username).await?;

    Ok(Json(ProfileResponse { profile }))
}

/// DELETE /api/profiles/{username}/follow
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = service::profiles::unfollow(&state.db, claims.user_id, &username).await?;

    Ok(Json(ProfileResponse { profile }))
}
