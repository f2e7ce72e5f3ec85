use axum::{Extension, Json, extract::State, response::IntoResponse};

use harambee_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = harambee_core::dashboard::build_dashboard(
        state.store.as_ref(),
        claims.sub,
        chrono::Utc::now(),
    )?;

    Ok(Json(dashboard))
}
