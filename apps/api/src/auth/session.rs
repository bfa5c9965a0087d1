//! Bearer session tokens. The token itself is returned to the client once;
//! the store keeps only its SHA-256 digest with an expiry, so a leaked
//! sessions table cannot be replayed.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

const TOKEN_LEN: usize = 48;

pub fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub fn token_digest(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

/// Creates a session for a user and returns the raw token.
pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let token = new_token();
    sqlx::query("INSERT INTO sessions (token_digest, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token_digest(&token))
        .bind(user_id)
        .bind(Utc::now() + Duration::hours(ttl_hours))
        .execute(pool)
        .await?;
    Ok(token)
}

/// Revokes the session behind a raw token. Revoking an unknown token is a no-op.
pub async fn revoke_session(pool: &PgPool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token_digest = $1")
        .bind(token_digest(token))
        .execute(pool)
        .await?;
    Ok(())
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// The explicit session context. Extracting it resolves the bearer token
/// to the calling user; handlers never consult ambient auth state.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserRow,
}

impl Session {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let user: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT u.* FROM users u
            JOIN sessions s ON s.user_id = u.id
            WHERE s.token_digest = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token_digest(token))
        .fetch_optional(&state.db)
        .await?;

        let user = user
            .ok_or_else(|| AppError::Unauthorized("Session expired or invalid".to_string()))?;

        Ok(Session { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_digest_is_stable_and_token_free() {
        let token = new_token();
        assert_eq!(token.len(), TOKEN_LEN);
        let digest = token_digest(&token);
        assert_eq!(digest, token_digest(&token));
        assert!(!digest.contains(&token));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_missing_or_malformed_authorization_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
