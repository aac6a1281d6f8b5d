//! One-time use of password reset tokens

use sqlx::PgPool;

use crate::error::BoxError;

/// Consume reset token `jti` and store the new password hash in one transaction.
///
/// Returns `false` without changing anything when the user no longer exists
/// or the token was already used.
pub async fn consume_and_set_password(
    pool: &PgPool,
    jti: &str,
    user_id: &str,
    password_hash: &str,
    now: i64,
) -> Result<bool, BoxError> {
    let mut tx = pool.begin().await?;

    // The user row must exist before the jti can reference it
    let updated = sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(password_hash)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if updated.rows_affected() == 0 {
        return Ok(false);
    }

    let consumed = sqlx::query(
        "INSERT INTO consumed_reset_tokens (jti, user_id, consumed_at) VALUES ($1, $2, $3) \
         ON CONFLICT (jti) DO NOTHING",
    )
    .bind(jti)
    .bind(user_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    if consumed.rows_affected() == 0 {
        // Dropping the transaction rolls back the password update
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}
