//! HTTP surface. Handlers stay thin: decode, delegate to [`crate::service`],
//! wrap the composed view in its response envelope.
use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use crate::state::AppState;

pub mod articles;
pub mod comments;
pub mod profiles;
pub mod tags;
pub mod users;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/users", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/user", get(users::current).put(users::update))
        .route("/api/profiles/{username}", get(profiles::get))
        .route(
            "/api/profiles/{username}/follow",
            post(profiles::follow).delete(profiles::unfollow),
        )
        .route("/api/articles", get(articles::list).post(articles::create))
        .route("/api/articles/feed", get(articles::feed))
        .route(
            "/api/articles/{slug}",
            get(articles::get).put(articles::update).delete(articles::remove),
        )
        .route(
            "/api/articles/{slug}/favorite",
            post(articles::favorite).delete(articles::unfavorite),
        )
        .route(
            "/api/articles/{slug}/comments",
            get(comments::list).post(comments::create),
        )
        .route("/api/articles/{slug}/comments/{id}", delete(comments::remove))
        .route("/api/tags", get(tags::list))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
