use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{Profile, UserRow},
};

pub async fn insert(
    pool: &SqlitePool,
    email: &str,
    username: &str,
    password_hash: &str,
) -> Result<UserRow, AppError> {
    let now = Utc::now();

    let result = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (email, username, password_hash, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await;

    match result {
        Ok(user) => Ok(user),
        // A concurrent writer winning the uniqueness race is the same
        // terminal outcome as a pre-checked duplicate.
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Validation(
            "email or username already taken".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn update(pool: &SqlitePool, user: &UserRow) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE users SET email = ?, username = ?, password_hash = ?, bio = ?, image = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.bio)
    .bind(&user.image)
    .bind(Utc::now())
    .bind(user.id)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Validation(
            "email or username already taken".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn by_id(pool: &SqlitePool, id: i64) -> Result<Option<UserRow>, AppError> {
    Ok(sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, AppError> {
    Ok(sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?)
}

pub async fn by_username(pool: &SqlitePool, username: &str) -> Result<Option<UserRow>, AppError> {
    Ok(sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool, AppError> {
    Ok(
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = ?)")
            .bind(email)
            .fetch_one(pool)
            .await?,
    )
}

pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool, AppError> {
    Ok(
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)")
            .bind(username)
            .fetch_one(pool)
            .await?,
    )
}

/// Profile with viewer-scoped following state in a single read. A viewer
/// of 0 matches no follow edge, so anonymous callers bind 0 and get
/// `following = false` for free.
pub async fn profile_by_username(
    pool: &SqlitePool,
    username: &str,
    viewer: Option<i64>,
) -> Result<Option<Profile>, AppError> {
    Ok(sqlx::query_as(
        "SELECT u.username, u.bio, u.image,
                EXISTS (
                    SELECT 1 FROM follows f
                    WHERE f.followed_id = u.id AND f.follower_id = ?
                ) AS following
         FROM users u
         WHERE u.username = ?",
    )
    .bind(viewer.unwrap_or(0))
    .bind(username)
    .fetch_optional(pool)
    .await?)
}
