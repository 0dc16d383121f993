use chrono::Utc;
use sqlx::SqlitePool;

use crate::{error::AppError, models::CommentRow};

pub async fn insert(
    pool: &SqlitePool,
    article_id: i64,
    author_id: i64,
    body: &str,
) -> Result<CommentRow, AppError> {
    let now = Utc::now();

    Ok(sqlx::query_as(
        "INSERT INTO comments (body, author_id, article_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(body)
    .bind(author_id)
    .bind(article_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?)
}

pub async fn for_article(pool: &SqlitePool, article_id: i64) -> Result<Vec<CommentRow>, AppError> {
    Ok(sqlx::query_as(
        "SELECT * FROM comments WHERE article_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?)
}

/// Delete only when the requester authored the comment. Returns whether a
/// row went away; a comment that exists but belongs to someone else is
/// indistinguishable from a missing one, on purpose.
pub async fn delete_owned(pool: &SqlitePool, id: i64, author_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ? AND author_id = ?")
        .bind(id)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
