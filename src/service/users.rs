use sqlx::SqlitePool;

use crate::{
    auth,
    error::AppError,
    models::{Credentials, NewUser, UserRow, UserUpdate},
    store,
};

const MIN_PASSWORD_LEN: usize = 6;

fn required(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

pub async fn register(pool: &SqlitePool, new: NewUser) -> Result<UserRow, AppError> {
    required(&new.email, "email is required")?;
    required(&new.username, "username is required")?;
    required(&new.password, "password is required")?;
    if new.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }

    if store::users::email_exists(pool, &new.email).await? {
        return Err(AppError::Validation("email already taken".to_string()));
    }
    if store::users::username_exists(pool, &new.username).await? {
        return Err(AppError::Validation("username already taken".to_string()));
    }

    let password_hash = auth::hash_password(&new.password)?;

    store::users::insert(pool, &new.email, &new.username, &password_hash).await
}

/// Wrong email and wrong password produce the same error, so a caller
/// cannot probe which accounts exist.
pub async fn login(pool: &SqlitePool, credentials: Credentials) -> Result<UserRow, AppError> {
    required(&credentials.email, "email is required")?;
    required(&credentials.password, "password is required")?;

    let user = store::users::by_email(pool, &credentials.email)
        .await?
        .ok_or(AppError::Auth("invalid email or password"))?;

    if !auth::verify_password(&user.password_hash, &credentials.password) {
        return Err(AppError::Auth("invalid email or password"));
    }

    Ok(user)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<UserRow, AppError> {
    store::users::by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("user"))
}

pub async fn update(pool: &SqlitePool, id: i64, update: UserUpdate) -> Result<UserRow, AppError> {
    let mut user = get(pool, id).await?;

    if let Some(email) = update.email {
        if email != user.email {
            if store::users::email_exists(pool, &email).await? {
                return Err(AppError::Validation("email already taken".to_string()));
            }
            user.email = email;
        }
    }

    if let Some(username) = update.username {
        if username != user.username {
            if store::users::username_exists(pool, &username).await? {
                return Err(AppError::Validation("username already taken".to_string()));
            }
            user.username = username;
        }
    }

    if let Some(password) = update.password {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(
                "password must be at least 6 characters".to_string(),
            ));
        }
        user.password_hash = auth::hash_password(&password)?;
    }

    if let Some(bio) = update.bio {
        user.bio = Some(bio);
    }

    if let Some(image) = update.image {
        user.image = Some(image);
    }

    store::users::update(pool, &user).await?;

    get(pool, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    fn new_user(email: &str, username: &str, password: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_and_login() {
        let pool = testutil::pool().await;

        let user = register(&pool, new_user("a@x.com", "alice", "secret1"))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "secret1");

        let logged_in = login(
            &pool,
            Credentials {
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let pool = testutil::pool().await;
        register(&pool, new_user("a@x.com", "alice", "secret1"))
            .await
            .unwrap();

        let wrong_password = login(
            &pool,
            Credentials {
                email: "a@x.com".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap_err();
        let wrong_email = login(
            &pool,
            Credentials {
                email: "nobody@x.com".to_string(),
                password: "secret1".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.to_string(), wrong_email.to_string());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let pool = testutil::pool().await;
        register(&pool, new_user("a@x.com", "alice", "secret1"))
            .await
            .unwrap();

        let err = register(&pool, new_user("a@x.com", "alice2", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = register(&pool, new_user("a2@x.com", "alice", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let pool = testutil::pool().await;

        let err = register(&pool, new_user("a@x.com", "alice", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields() {
        let pool = testutil::pool().await;
        let user = register(&pool, new_user("a@x.com", "alice", "secret1"))
            .await
            .unwrap();

        let updated = update(
            &pool,
            user.id,
            UserUpdate {
                bio: Some("rustacean".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.bio.as_deref(), Some("rustacean"));
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.username, "alice");
    }

    #[tokio::test]
    async fn update_to_taken_username_rejected() {
        let pool = testutil::pool().await;
        register(&pool, new_user("a@x.com", "alice", "secret1"))
            .await
            .unwrap();
        let bob = register(&pool, new_user("b@x.com", "bob", "secret1"))
            .await
            .unwrap();

        let err = update(
            &pool,
            bob.id,
            UserUpdate {
                username: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
