//! Token issue/verify, credential hashing and the request extractors that
//! turn an `Authorization: Token <jwt>` header into a decoded identity.
//!
//! Signing state lives on [`crate::state::AppState`], never in a process
//! global, so tests can run isolated instances side by side.
use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::UserRow, state::AppState};

const TOKEN_LIFETIME_HOURS: i64 = 24;
const SCHEME: &str = "Token ";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

pub struct Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Jwt {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user: &UserRow) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            exp: (now + chrono::Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
            iat: now.timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(Box::new(e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Auth("invalid token"))
    }
}

pub fn hash_password(plaintext: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(e.to_string().into()))
}

pub fn verify_password(digest: &str, plaintext: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Ownership predicate consulted before every mutation of an owned
/// resource. No operation may touch storage before this check passes.
pub fn is_owner(author_id: i64, requester_id: i64) -> bool {
    author_id == requester_id
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(SCHEME)
        .filter(|token| !token.is_empty())
}

/// Mandatory identity; rejects the request with 401 when the header is
/// missing, malformed or carries an invalid token.
pub struct AuthUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Auth("missing authorization token"))?;

        Ok(AuthUser(state.jwt.verify(token)?))
    }
}

/// Optional identity; anything short of a valid token means anonymous.
pub struct OptionalAuth(pub Option<Claims>);

impl OptionalAuth {
    pub fn viewer(&self) -> Option<i64> {
        self.0.as_ref().map(|claims| claims.user_id)
    }
}

impl FromRequestParts<Arc<AppState>> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(parts).and_then(|token| state.jwt.verify(token).ok());

        Ok(OptionalAuth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    fn user() -> UserRow {
        testutil::user_row(7, "alice", "a@x.com")
    }

    #[test]
    fn token_round_trip() {
        let jwt = Jwt::new("test-secret");
        let token = jwt.issue(&user()).unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = Jwt::new("one").issue(&user()).unwrap();

        assert!(matches!(
            Jwt::new("two").verify(&token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(Jwt::new("s").verify("not-a-token").is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let digest = hash_password("secret1").unwrap();

        assert_ne!(digest, "secret1");
        assert!(verify_password(&digest, "secret1"));
        assert!(!verify_password(&digest, "secret2"));
        assert!(!verify_password("not-a-digest", "secret1"));
    }

    #[test]
    fn ownership_predicate() {
        assert!(is_owner(3, 3));
        assert!(!is_owner(3, 4));
    }
}
