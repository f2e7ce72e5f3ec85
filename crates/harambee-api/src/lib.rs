//! HTTP surface of the harambee backend: axum handlers, JWT auth, and the
//! JSON error contract shared by every endpoint.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod groups;
pub mod investments;
pub mod meetings;
pub mod members;
pub mod middleware;
pub mod notifications;
pub mod transactions;
pub mod users;

pub use auth::{AppState, AppStateInner};

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

/// Builds the full API router: the two public auth routes merged with the
/// JWT-protected rest of the surface.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/users/me", put(users::update_profile))
        .route("/api/groups", get(groups::list_groups))
        .route("/api/groups", post(groups::create_group))
        .route("/api/groups/{group_id}", get(groups::get_group))
        .route("/api/groups/{group_id}", put(groups::update_group))
        .route("/api/groups/{group_id}/members", post(members::add_member))
        .route("/api/members/{member_id}", put(members::update_member))
        .route("/api/transactions", get(transactions::list_transactions))
        .route("/api/transactions", post(transactions::create_transaction))
        .route(
            "/api/groups/{group_id}/transactions",
            get(transactions::group_transactions),
        )
        .route("/api/meetings", get(meetings::list_meetings))
        .route(
            "/api/groups/{group_id}/meetings",
            post(meetings::create_meeting),
        )
        .route("/api/investments", get(investments::list_investments))
        .route(
            "/api/groups/{group_id}/investments",
            post(investments::create_investment),
        )
        .route(
            "/api/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/notifications/{notification_id}/read",
            put(notifications::mark_read),
        )
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
