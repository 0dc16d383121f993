use sqlx::SqlitePool;

use crate::{error::AppError, models::Profile, store};

/// Profile with viewer-scoped following state; anonymous viewers always
/// see `following = false`.
pub async fn get(
    pool: &SqlitePool,
    username: &str,
    viewer: Option<i64>,
) -> Result<Profile, AppError> {
    store::users::profile_by_username(pool, username, viewer)
        .await?
        .ok_or(AppError::NotFound("profile"))
}

pub async fn follow(
    pool: &SqlitePool,
    follower_id: i64,
    username: &str,
) -> Result<Profile, AppError> {
    let target = store::users::by_username(pool, username)
        .await?
        .ok_or(AppError::NotFound("profile"))?;

    if target.id == follower_id {
        return Err(AppError::Validation("cannot follow yourself".to_string()));
    }

    store::social::follow(pool, follower_id, target.id).await?;

    get(pool, username, Some(follower_id)).await
}

pub async fn unfollow(
    pool: &SqlitePool,
    follower_id: i64,
    username: &str,
) -> Result<Profile, AppError> {
    let target = store::users::by_username(pool, username)
        .await?
        .ok_or(AppError::NotFound("profile"))?;

    if !store::social::unfollow(pool, follower_id, target.id).await? {
        return Err(AppError::NotFound("follow"));
    }

    get(pool, username, Some(follower_id)).await
}
