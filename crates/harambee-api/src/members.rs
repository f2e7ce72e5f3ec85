use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use harambee_core::{membership, policy};
use harambee_types::api::{AddMemberRequest, Claims, UpdateMemberRequest};
use harambee_types::models::{MembershipPatch, NewMembership};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::require_role;

pub async fn add_member(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(
        &state,
        claims.sub,
        group_id,
        policy::MEMBER_CREATE,
        "Not authorized to add members",
    )?;

    // One active membership per user and group
    if membership::active_membership(state.store.as_ref(), req.user_id, group_id)?.is_some() {
        return Err(ApiError::Conflict(
            "User is already a member of this group".into(),
        ));
    }

    let member = state.store.create_membership(NewMembership {
        user_id: req.user_id,
        group_id,
        role: req.role,
        joined_date: chrono::Utc::now(),
        total_contributed: 0,
        is_active: true,
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "member": member }))))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let member = state
        .store
        .get_membership(member_id)?
        .ok_or_else(|| ApiError::NotFound("Member not found".into()))?;

    require_role(
        &state,
        claims.sub,
        member.group_id,
        policy::MEMBER_UPDATE,
        "Not authorized to update members",
    )?;

    let patch = MembershipPatch {
        role: req.role,
        total_contributed: None,
        is_active: req.is_active,
    };

    let member = state
        .store
        .update_membership(member_id, patch)?
        .ok_or_else(|| ApiError::NotFound("Member not found".into()))?;

    Ok(Json(json!({ "member": member })))
}
