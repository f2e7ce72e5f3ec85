use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;

use harambee_types::api::{Claims, UpdateProfileRequest, UserResponse};
use harambee_types::models::UserPatch;

use crate::auth::AppState;
use crate::error::ApiError;

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = UserPatch {
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        phone_number: req.phone_number,
        profile_picture: req.profile_picture,
        preferred_language: req.preferred_language,
    };

    let user = state
        .store
        .update_user(claims.sub, patch)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(json!({ "user": UserResponse::from(user) })))
}
