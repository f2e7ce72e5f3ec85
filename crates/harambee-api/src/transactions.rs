use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use harambee_types::api::{Claims, CreateTransactionRequest};
use harambee_types::models::NewTransaction;

use crate::auth::AppState;
use crate::error::{ApiError, FieldError};

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.store.get_transactions_by_user(claims.sub)?;
    Ok(Json(json!({ "transactions": transactions })))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.amount <= 0 {
        return Err(ApiError::Validation(vec![FieldError::new(
            "amount",
            "Amount must be positive",
        )]));
    }

    // Completed contributions accrue onto the member's running total in the
    // same store operation.
    let transaction = state.store.record_transaction(NewTransaction {
        group_id: req.group_id,
        user_id: claims.sub,
        amount: req.amount,
        kind: req.kind,
        status: req.status,
        date: req.date,
        payment_method: req.payment_method,
        description: req.description,
        reference_number: req.reference_number,
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "transaction": transaction }))))
}

pub async fn group_transactions(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    // Any membership in the group grants access, active or not.
    let is_member = state
        .store
        .get_memberships_by_user(claims.sub)?
        .iter()
        .any(|m| m.group_id == group_id);
    if !is_member {
        return Err(ApiError::Forbidden(
            "Not authorized to view these transactions".into(),
        ));
    }

    let transactions = state.store.get_transactions_by_group(group_id)?;
    Ok(Json(json!({ "transactions": transactions })))
}
