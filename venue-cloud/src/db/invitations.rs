//! Admin invitation operations

use sqlx::PgPool;

use crate::error::BoxError;

/// Delete an invitation; returns the number of rows removed
pub async fn delete(pool: &PgPool, id: &str) -> Result<u64, BoxError> {
    let result = sqlx::query("DELETE FROM admin_invitations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
