//! Authentication: salted password digests, opaque bearer session tokens,
//! and the `Session` extractor handlers use as their explicit session
//! context.

pub mod handlers;
pub mod password;
pub mod session;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::user::ROLE_ADMIN;

/// Provisions the bootstrap admin account when `ADMIN_EMAIL` and
/// `ADMIN_PASSWORD` are configured and no such user exists yet.
pub async fn ensure_admin(pool: &PgPool, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(pass)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await?;
    if exists {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO users (id, email, name, role, password_digest) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind("Administrator")
    .bind(ROLE_ADMIN)
    .bind(password::hash_password(pass))
    .execute(pool)
    .await?;

    info!("Bootstrap admin account provisioned for {email}");
    Ok(())
}
