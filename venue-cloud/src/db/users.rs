//! User lookups

use sqlx::PgPool;

use crate::error::BoxError;

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_platform_admin: bool,
}

/// Find a user by (already lowercased) email
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, BoxError> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, email, name, password_hash, is_platform_admin FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
