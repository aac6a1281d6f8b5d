//! Admin login audit listing

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::LoginStatus;

use crate::api::ApiResult;
use crate::db;
use crate::db::login_logs::{LoginLogEntry, LoginLogFilter, LoginStats, STATS_WINDOW_MS};
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::now_millis;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLogsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub email: Option<String>,
    pub status: Option<LoginStatus>,
    pub include_stats: Option<bool>,
}

impl LoginLogsQuery {
    fn page(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[derive(Serialize)]
pub struct LoginLogsResponse {
    pub logs: Vec<LoginLogEntry>,
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<LoginStats>,
}

/// GET /api/admin/login-logs
pub async fn list_login_logs(
    State(state): State<AppState>,
    query: Result<Query<LoginLogsQuery>, QueryRejection>,
) -> ApiResult<LoginLogsResponse> {
    let Query(query) = query.map_err(|e| AppError::invalid_request(e.body_text()))?;
    let (limit, offset) = query.page();
    let filter = LoginLogFilter {
        email: query
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty()),
        status: query.status,
    };

    let logs = db::login_logs::query(&state.pool, &filter, limit, offset)
        .await
        .map_err(ServiceError::from)?;
    let total = db::login_logs::count(&state.pool, &filter)
        .await
        .map_err(ServiceError::from)?;

    let stats = if query.include_stats.unwrap_or(false) {
        let since = now_millis() - STATS_WINDOW_MS;
        Some(
            db::login_logs::stats_since(&state.pool, since)
                .await
                .map_err(ServiceError::from)?,
        )
    } else {
        None
    };

    Ok(Json(LoginLogsResponse { logs, total, stats }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_bounds() {
        assert_eq!(LoginLogsQuery::default().page(), (50, 0));

        let big = LoginLogsQuery {
            limit: Some(10_000),
            offset: Some(-3),
            ..Default::default()
        };
        assert_eq!(big.page(), (200, 0));

        let zero = LoginLogsQuery {
            limit: Some(0),
            offset: Some(40),
            ..Default::default()
        };
        assert_eq!(zero.page(), (1, 40));
    }
}
