use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    auth::AuthUser,
    error::AppError,
    models::{Credentials, NewUser, UserBody, UserResponse, UserUpdate, UserView},
    service,
    state::AppState,
};

/// POST /api/users
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserBody<NewUser>>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = service::users::register(&state.db, body.user).await?;
    let token = state.jwt.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: UserView::new(user, token),
        }),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserBody<Credentials>>,
) -> Result<Json<UserResponse>, AppError> {
    let user = service::users::login(&state.db, body.user).await?;
    let token = state.jwt.issue(&user)?;

    Ok(Json(UserResponse {
        user: UserView::new(user, token),
    }))
}

/// GET /api/user
pub async fn current(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = service::users::get(&state.db, claims.user_id).await?;
    let token = state.jwt.issue(&user)?;

    Ok(Json(UserResponse {
        user: UserView::new(user, token),
    }))
}

/// PUT /api/user
pub async fn update(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(body): Json<UserBody<UserUpdate>>,
) -> Result<Json<UserResponse>, AppError> {
    let user = service::users::update(&state.db, claims.user_id, body.user).await?;
    let token = state.jwt.issue(&user)?;

    Ok(Json(UserResponse {
        user: UserView::new(user, token),
    }))
}
