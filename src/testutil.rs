//! Shared fixtures for the in-module test suites.
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db,
    models::{ArticleView, NewArticle, UserRow},
    service, store,
};

/// Fresh in-memory database with the full schema. One connection, so
/// every query in a test sees the same memory store.
pub async fn pool() -> SqlitePool {
    db::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database")
}

/// Insert a user directly; the stored hash is a placeholder, so these
/// fixtures cannot log in. Use `service::users::register` where the
/// credential path matters.
pub async fn user(pool: &SqlitePool, username: &str) -> UserRow {
    store::users::insert(pool, &format!("{username}@example.com"), username, "x")
        .await
        .expect("fixture user")
}

pub async fn article(pool: &SqlitePool, author_id: i64, title: &str) -> ArticleView {
    service::articles::create(
        pool,
        author_id,
        NewArticle {
            title: title.to_string(),
            description: "a description".to_string(),
            body: "a body".to_string(),
            tag_list: None,
        },
    )
    .await
    .expect("fixture article")
}

/// Detached row for tests that never touch storage.
pub fn user_row(id: i64, username: &str, email: &str) -> UserRow {
    let now = Utc::now();

    UserRow {
        id,
        email: email.to_string(),
        username: username.to_string(),
        password_hash: "x".to_string(),
        bio: None,
        image: None,
        created_at: now,
        updated_at: now,
    }
}
