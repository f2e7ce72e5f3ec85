use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use harambee_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let mut notifications = state.store.get_notifications_by_user(claims.sub)?;
    // Newest first
    notifications.sort_by_key(|n| std::cmp::Reverse(n.created_at));

    Ok(Json(json!({ "notifications": notifications })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let notification = state
        .store
        .get_notification(notification_id)?
        .ok_or_else(|| ApiError::NotFound("Notification not found".into()))?;

    if notification.user_id != claims.sub {
        return Err(ApiError::Forbidden(
            "Not authorized to update this notification".into(),
        ));
    }

    state.store.mark_notification_read(notification_id)?;

    Ok(Json(json!({ "success": true })))
}
