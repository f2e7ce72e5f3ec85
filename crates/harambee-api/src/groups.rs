use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use harambee_core::{membership, policy};
use harambee_types::api::{Claims, CreateGroupRequest, UpdateGroupRequest};
use harambee_types::models::{GroupPatch, NewGroup, NewMembership, Role};

use crate::auth::AppState;
use crate::error::{ApiError, FieldError};
use crate::middleware::require_role;

pub async fn list_groups(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let groups = membership::active_groups(state.store.as_ref(), claims.sub)?;
    Ok(Json(json!({ "groups": groups })))
}

pub async fn create_group(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if req.description.trim().is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    }
    if req.regular_contribution_amount <= 0 {
        errors.push(FieldError::new(
            "regularContributionAmount",
            "Contribution amount must be positive",
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let group = state.store.create_group(NewGroup {
        name: req.name,
        description: req.description,
        founded_date: req.founded_date,
        total_value: 0,
        regular_contribution_amount: req.regular_contribution_amount,
        contribution_frequency: req.contribution_frequency,
        owner_id: claims.sub,
    })?;

    // The creator joins as the first admin member
    state.store.create_membership(NewMembership {
        user_id: claims.sub,
        group_id: group.id,
        role: Role::Admin,
        joined_date: chrono::Utc::now(),
        total_contributed: 0,
        is_active: true,
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "group": group }))))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let group = state
        .store
        .get_group(group_id)?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;

    let members = state.store.get_memberships_by_group(group_id)?;

    Ok(Json(json!({ "group": group, "members": members })))
}

pub async fn update_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(
        &state,
        claims.sub,
        group_id,
        policy::GROUP_UPDATE,
        "Not authorized to update this group",
    )?;

    let patch = GroupPatch {
        name: req.name,
        description: req.description,
        founded_date: req.founded_date,
        total_value: req.total_value,
        regular_contribution_amount: req.regular_contribution_amount,
        contribution_frequency: req.contribution_frequency,
    };

    let group = state
        .store
        .update_group(group_id, patch)?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;

    Ok(Json(json!({ "group": group })))
}
