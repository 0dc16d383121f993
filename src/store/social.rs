//! Follow and favorite edges.
//!
//! Inserts are `INSERT OR IGNORE`: a duplicate edge is a silent no-op,
//! which also settles concurrent duplicate writers. Removals report
//! whether an edge actually existed so callers can surface the
//! remove-when-absent error.
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;

pub async fn follow(pool: &SqlitePool, follower_id: i64, followed_id: i64) -> Result<(), AppError> {
    sqlx::query("INSERT OR IGNORE INTO follows (follower_id, followed_id, created_at) VALUES (?, ?, ?)")
        .bind(follower_id)
        .bind(followed_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn unfollow(
    pool: &SqlitePool,
    follower_id: i64,
    followed_id: i64,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
        .bind(follower_id)
        .bind(followed_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_following(
    pool: &SqlitePool,
    follower_id: i64,
    followed_id: i64,
) -> Result<bool, AppError> {
    Ok(sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = ? AND followed_id = ?)",
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await?)
}

pub async fn favorite(pool: &SqlitePool, user_id: i64, article_id: i64) -> Result<(), AppError> {
    sqlx::query("INSERT OR IGNORE INTO favorites (user_id, article_id, created_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(article_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn unfavorite(
    pool: &SqlitePool,
    user_id: i64,
    article_id: i64,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND article_id = ?")
        .bind(user_id)
        .bind(article_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_favorited(
    pool: &SqlitePool,
    user_id: i64,
    article_id: i64,
) -> Result<bool, AppError> {
    Ok(sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = ? AND article_id = ?)",
    )
    .bind(user_id)
    .bind(article_id)
    .fetch_one(pool)
    .await?)
}

pub async fn favorites_count(pool: &SqlitePool, article_id: i64) -> Result<i64, AppError> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE article_id = ?")
            .bind(article_id)
            .fetch_one(pool)
            .await?,
    )
}
