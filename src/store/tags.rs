use sqlx::SqlitePool;

use crate::error::AppError;

/// Tag names are case-normalized; lookups and inserts go through this.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Get-or-create by name. `INSERT OR IGNORE` followed by a lookup keeps
/// concurrent first users of a tag from failing each other.
async fn get_or_create(pool: &SqlitePool, name: &str) -> Result<i64, AppError> {
    sqlx::query("INSERT OR IGNORE INTO tags (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await?)
}

/// Replace the article's tag set wholesale: clear, then attach each
/// normalized, non-empty name. Tags themselves are never deleted.
pub async fn replace_for_article(
    pool: &SqlitePool,
    article_id: i64,
    names: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM article_tags WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await?;

    for name in names {
        let name = normalize(name);
        if name.is_empty() {
            continue;
        }

        let tag_id = get_or_create(pool, &name).await?;

        sqlx::query("INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?, ?)")
            .bind(article_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// Tag names for one article, lexicographically ordered.
pub async fn for_article(pool: &SqlitePool, article_id: i64) -> Result<Vec<String>, AppError> {
    Ok(sqlx::query_scalar(
        "SELECT t.name FROM tags t
         JOIN article_tags at ON at.tag_id = t.id
         WHERE at.article_id = ?
         ORDER BY t.name",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?)
}

pub async fn all(pool: &SqlitePool) -> Result<Vec<String>, AppError> {
    Ok(sqlx::query_scalar("SELECT name FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?)
}
