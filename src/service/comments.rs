use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{CommentRow, CommentView, Profile},
    store,
};

pub async fn compose(
    pool: &SqlitePool,
    comment: &CommentRow,
    viewer: Option<i64>,
) -> Result<CommentView, AppError> {
    let author = store::users::by_id(pool, comment.author_id)
        .await?
        .ok_or(AppError::NotFound("comment author"))?;

    let following = match viewer {
        Some(viewer) => store::social::is_following(pool, viewer, author.id).await?,
        None => false,
    };

    Ok(CommentView {
        id: comment.id,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
        body: comment.body.clone(),
        author: Profile {
            username: author.username,
            bio: author.bio,
            image: author.image,
            following,
        },
    })
}

pub async fn list(
    pool: &SqlitePool,
    slug: &str,
    viewer: Option<i64>,
) -> Result<Vec<CommentView>, AppError> {
    let article = store::articles::by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound("article"))?;

    let comments = store::comments::for_article(pool, article.id).await?;

    let mut views = Vec::with_capacity(comments.len());
    for comment in &comments {
        views.push(compose(pool, comment, viewer).await?);
    }

    Ok(views)
}

pub async fn create(
    pool: &SqlitePool,
    slug: &str,
    author_id: i64,
    body: &str,
) -> Result<CommentView, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("comment body is required".to_string()));
    }

    let article = store::articles::by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound("article"))?;

    let comment = store::comments::insert(pool, article.id, author_id, body).await?;

    compose(pool, &comment, Some(author_id)).await
}

/// Non-owners get the same outcome as a missing comment; existence is not
/// leaked to anyone who could not delete it anyway.
pub async fn delete(pool: &SqlitePool, id: i64, requester_id: i64) -> Result<(), AppError> {
    if !store::comments::delete_owned(pool, id, requester_id).await? {
        return Err(AppError::NotFound("comment"));
    }

    Ok(())
}
