//! Admin login audit log

use serde::Serialize;
use shared::models::LoginStatus;
use sqlx::PgPool;

use crate::error::BoxError;

/// Stats window: the last 24 hours
pub const STATS_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

pub struct NewLoginLog<'a> {
    pub email: &'a str,
    pub user_id: Option<&'a str>,
    pub ip_address: &'a str,
    pub user_agent: Option<&'a str>,
    pub status: LoginStatus,
}

/// Write a login attempt
pub async fn insert(pool: &PgPool, entry: &NewLoginLog<'_>, now: i64) -> Result<(), BoxError> {
    sqlx::query(
        "INSERT INTO admin_login_logs (email, user_id, ip_address, user_agent, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(entry.email)
    .bind(entry.user_id)
    .bind(entry.ip_address)
    .bind(entry.user_agent)
    .bind(entry.status.as_str())
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLogEntry {
    pub id: i64,
    pub email: String,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: String,
    pub created_at: i64,
}

/// Optional filters shared by [`query`] and [`count`]
#[derive(Debug, Default)]
pub struct LoginLogFilter {
    pub email: Option<String>,
    pub status: Option<LoginStatus>,
}

pub async fn query(
    pool: &PgPool,
    filter: &LoginLogFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<LoginLogEntry>, BoxError> {
    let rows: Vec<LoginLogEntry> = sqlx::query_as(
        "SELECT id, email, user_id, ip_address, user_agent, status, created_at \
         FROM admin_login_logs \
         WHERE ($1::text IS NULL OR email = $1) AND ($2::text IS NULL OR status = $2) \
         ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4",
    )
    .bind(filter.email.as_deref())
    .bind(filter.status.map(|s| s.as_str()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count(pool: &PgPool, filter: &LoginLogFilter) -> Result<i64, BoxError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM admin_login_logs \
         WHERE ($1::text IS NULL OR email = $1) AND ($2::text IS NULL OR status = $2)",
    )
    .bind(filter.email.as_deref())
    .bind(filter.status.map(|s| s.as_str()))
    .fetch_one(pool)
    .await?;
    Ok(total)
}

#[derive(Debug, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStats {
    pub total_attempts: i64,
    pub successful: i64,
    pub failed: i64,
    pub rate_limited: i64,
    pub unique_ips: i64,
}

/// Attempt counts since `since` (unix ms)
pub async fn stats_since(pool: &PgPool, since: i64) -> Result<LoginStats, BoxError> {
    let stats: LoginStats = sqlx::query_as(
        "SELECT COUNT(*) AS total_attempts, \
                COUNT(*) FILTER (WHERE status = 'success') AS successful, \
                COUNT(*) FILTER (WHERE status = 'failed') AS failed, \
                COUNT(*) FILTER (WHERE status = 'rate_limited') AS rate_limited, \
                COUNT(DISTINCT ip_address) AS unique_ips \
         FROM admin_login_logs WHERE created_at >= $1",
    )
    .bind(since)
    .fetch_one(pool)
    .await?;
    Ok(stats)
}
