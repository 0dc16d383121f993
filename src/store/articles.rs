use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::AppError,
    models::ArticleRow,
    pagination::{ArticleFilter, Page},
};

const COLUMNS: &str =
    "a.id, a.slug, a.title, a.description, a.body, a.author_id, a.created_at, a.updated_at";

// Most recent first; equal timestamps keep insertion order.
const ORDERING: &str = " ORDER BY a.created_at DESC, a.id ASC";

pub async fn insert(
    pool: &SqlitePool,
    slug: &str,
    title: &str,
    description: &str,
    body: &str,
    author_id: i64,
) -> Result<ArticleRow, AppError> {
    let now = Utc::now();

    Ok(sqlx::query_as(
        "INSERT INTO articles (slug, title, description, body, author_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(slug)
    .bind(title)
    .bind(description)
    .bind(body)
    .bind(author_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?)
}

pub async fn update(pool: &SqlitePool, article: &ArticleRow) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE articles SET slug = ?, title = ?, description = ?, body = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&article.slug)
    .bind(&article.title)
    .bind(&article.description)
    .bind(&article.body)
    .bind(Utc::now())
    .bind(article.id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Cascades to tag associations, comments and favorites via foreign keys.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<ArticleRow>, AppError> {
    Ok(
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM articles a WHERE a.slug = ?"))
            .bind(slug)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn slug_exists(pool: &SqlitePool, slug: &str) -> Result<bool, AppError> {
    Ok(
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles WHERE slug = ?)")
            .bind(slug)
            .fetch_one(pool)
            .await?,
    )
}

fn push_filters<'qb>(builder: &mut QueryBuilder<'qb, Sqlite>, filter: &'qb ArticleFilter) {
    let mut keyword = " WHERE ";

    if let Some(tag) = &filter.tag {
        builder.push(keyword).push(
            "EXISTS (SELECT 1 FROM article_tags at
                     JOIN tags t ON t.id = at.tag_id
                     WHERE at.article_id = a.id AND t.name = ",
        );
        // Stored names are normalized, so the filter value must be too.
        builder.push_bind(super::tags::normalize(tag)).push(")");
        keyword = " AND ";
    }

    if let Some(author) = &filter.author {
        builder.push(keyword).push(
            "EXISTS (SELECT 1 FROM users u
                     WHERE u.id = a.author_id AND u.username = ",
        );
        builder.push_bind(author.as_str()).push(")");
        keyword = " AND ";
    }

    if let Some(favorited) = &filter.favorited {
        builder.push(keyword).push(
            "EXISTS (SELECT 1 FROM favorites f
                     JOIN users u ON u.id = f.user_id
                     WHERE f.article_id = a.id AND u.username = ",
        );
        builder.push_bind(favorited.as_str()).push(")");
    }
}

/// Filtered page of articles plus the total count matching the filter
/// before limit/offset, for client-side paging.
pub async fn list(
    pool: &SqlitePool,
    filter: &ArticleFilter,
    page: Page,
) -> Result<(Vec<ArticleRow>, i64), AppError> {
    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM articles a");
    push_filters(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut rows = QueryBuilder::new(format!("SELECT {COLUMNS} FROM articles a"));
    push_filters(&mut rows, filter);
    rows.push(ORDERING);
    rows.push(" LIMIT ").push_bind(page.limit);
    rows.push(" OFFSET ").push_bind(page.offset);

    let articles = rows.build_query_as().fetch_all(pool).await?;

    Ok((articles, total))
}

/// Articles authored by anyone the viewer follows.
pub async fn feed(
    pool: &SqlitePool,
    viewer: i64,
    page: Page,
) -> Result<(Vec<ArticleRow>, i64), AppError> {
    const FOLLOWED: &str =
        "a.author_id IN (SELECT f.followed_id FROM follows f WHERE f.follower_id = ?)";

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM articles a WHERE {FOLLOWED}"))
        .bind(viewer)
        .fetch_one(pool)
        .await?;

    let articles = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM articles a WHERE {FOLLOWED}{ORDERING} LIMIT ? OFFSET ?"
    ))
    .bind(viewer)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok((articles, total))
}
