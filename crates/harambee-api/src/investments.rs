use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::warn;

use harambee_core::{notify, policy};
use harambee_types::api::{Claims, CreateInvestmentRequest, InvestmentWithGroup};
use harambee_types::models::{NewInvestment, NotificationKind};

use crate::auth::AppState;
use crate::error::{ApiError, FieldError};
use crate::middleware::require_role;

/// Investments across every group the caller has ever belonged to, with the
/// group name attached where the group still exists.
pub async fn list_investments(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let mut investments = Vec::new();
    for member in state.store.get_memberships_by_user(claims.sub)? {
        let group_name = state.store.get_group(member.group_id)?.map(|g| g.name);
        for investment in state.store.get_investments_by_group(member.group_id)? {
            investments.push(InvestmentWithGroup {
                investment,
                group_name: group_name.clone(),
            });
        }
    }

    Ok(Json(json!({ "investments": investments })))
}

pub async fn create_investment(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateInvestmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(
        &state,
        claims.sub,
        group_id,
        policy::INVESTMENT_CREATE,
        "Not authorized to create investments",
    )?;

    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if req.kind.trim().is_empty() {
        errors.push(FieldError::new("type", "Type is required"));
    }
    if req.amount <= 0 {
        errors.push(FieldError::new("amount", "Amount must be positive"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let group = state
        .store
        .get_group(group_id)?
        .ok_or_else(|| ApiError::NotFound("Group not found".into()))?;

    let investment = state.store.create_investment(NewInvestment {
        group_id,
        name: req.name,
        kind: req.kind,
        amount: req.amount,
        description: req.description,
        start_date: req.start_date,
        expected_return_rate: req.expected_return_rate,
        status: req.status,
        current_value: req.current_value,
    })?;

    // Notify the other members; a failed fan-out never blocks the investment.
    let message = format!(
        "A new investment \"{}\" worth KES {} has been created for {}.",
        investment.name, investment.amount, group.name
    );
    if let Err(e) = notify::notify_group_members(
        state.store.as_ref(),
        group_id,
        claims.sub,
        "New Investment Created",
        &message,
        NotificationKind::System,
        Some("/investments"),
    ) {
        warn!("investment notification fan-out failed: {}", e);
    }

    Ok((StatusCode::CREATED, Json(json!({ "investment": investment }))))
}
