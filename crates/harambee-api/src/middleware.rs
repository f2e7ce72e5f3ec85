use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use harambee_core::{membership, policy};
use harambee_types::api::Claims;
use harambee_types::models::Role;

use crate::auth::AppState;
use crate::error::ApiError;

/// Extract and validate the JWT from the Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}

/// Check the caller's active membership in the group against the allowed
/// roles, answering `denied` as a 403 when the check fails.
pub fn require_role(
    state: &AppState,
    user_id: i64,
    group_id: i64,
    required: &[Role],
    denied: &str,
) -> Result<(), ApiError> {
    let membership = membership::active_membership(state.store.as_ref(), user_id, group_id)?;
    if policy::can_act(membership.as_ref(), required) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(denied.to_string()))
    }
}
