//! Admin invitation management

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::ApiResult;
use crate::auth::AdminSession;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

/// DELETE /api/admin/invitations/{id}
///
/// Idempotent: deleting an invitation that is already gone still succeeds.
pub async fn delete_invitation(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let removed = db::invitations::delete(&state.pool, &id)
        .await
        .map_err(ServiceError::from)?;

    if removed == 0 {
        tracing::debug!(invitation_id = %id, "Invitation already removed");
    } else {
        tracing::info!(invitation_id = %id, admin_id = %admin.user_id, "Invitation revoked");
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
