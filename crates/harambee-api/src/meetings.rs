use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::warn;

use harambee_core::{notify, policy};
use harambee_types::api::{Claims, CreateMeetingRequest, MeetingWithGroup};
use harambee_types::models::{NewMeeting, NotificationKind};

use crate::auth::AppState;
use crate::error::{ApiError, FieldError};
use crate::middleware::require_role;

/// Meetings across every group the caller has ever belonged to, oldest
/// first, with the group name attached where the group still exists.
pub async fn list_meetings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let mut meetings = Vec::new();
    for member in state.store.get_memberships_by_user(claims.sub)? {
        let group_name = state.store.get_group(member.group_id)?.map(|g| g.name);
        for meeting in state.store.get_meetings_by_group(member.group_id)? {
            meetings.push(MeetingWithGroup {
                meeting,
                group_name: group_name.clone(),
            });
        }
    }
    meetings.sort_by_key(|m| m.meeting.date);

    Ok(Json(json!({ "meetings": meetings })))
}

pub async fn create_meeting(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateMeetingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(
        &state,
        claims.sub,
        group_id,
        policy::MEETING_CREATE,
        "Not authorized to create meetings",
    )?;

    if req.title.trim().is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "title",
            "Title is required",
        )]));
    }

    let group = state
        .store
        .get_group(group_id)?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;

    let meeting = state.store.create_meeting(NewMeeting {
        group_id,
        title: req.title,
        date: req.date,
        location: req.location,
        is_virtual: req.is_virtual,
        meeting_link: req.meeting_link,
        description: req.description,
        created_by: claims.sub,
    })?;

    // Notify the other members; a failed fan-out never blocks the meeting.
    let message = format!(
        "A new meeting for {} has been scheduled for {}.",
        group.name,
        meeting.date.format("%Y-%m-%d %H:%M")
    );
    if let Err(e) = notify::notify_group_members(
        state.store.as_ref(),
        group_id,
        claims.sub,
        "New Meeting Scheduled",
        &message,
        NotificationKind::Meeting,
        Some("/meetings"),
    ) {
        warn!("meeting notification fan-out failed: {}", e);
    }

    Ok((StatusCode::CREATED, Json(json!({ "meeting": meeting }))))
}
