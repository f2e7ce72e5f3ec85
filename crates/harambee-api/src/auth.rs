use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

use harambee_store::SharedStore;
use harambee_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest, UserResponse};
use harambee_types::models::NewUser;

use crate::error::{ApiError, FieldError};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: SharedStore,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    let mut errors = Vec::new();
    if req.username.len() < 3 || req.username.len() > 32 {
        errors.push(FieldError::new(
            "username",
            "Username must be between 3 and 32 characters",
        ));
    }
    if req.password.len() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if !req.email.contains('@') {
        errors.push(FieldError::new("email", "A valid email is required"));
    }
    if req.first_name.trim().is_empty() {
        errors.push(FieldError::new("firstName", "First name is required"));
    }
    if req.last_name.trim().is_empty() {
        errors.push(FieldError::new("lastName", "Last name is required"));
    }
    if req.phone_number.trim().is_empty() {
        errors.push(FieldError::new("phoneNumber", "Phone number is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Check if username or email is taken
    if state.store.get_user_by_username(&req.username)?.is_some() {
        return Err(ApiError::Conflict("Username already exists".into()));
    }
    if state.store.get_user_by_email(&req.email)?.is_some() {
        return Err(ApiError::Conflict("Email already exists".into()));
    }

    // Hash password with Argon2id
    let password_hash = hash_password(&req.password)?;

    let user = state.store.create_user(NewUser {
        username: req.username,
        password_hash,
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        phone_number: req.phone_number,
        profile_picture: req.profile_picture,
        preferred_language: req.preferred_language.unwrap_or_else(|| "en".into()),
    })?;

    let token = create_token(&state.jwt_secret, user.id, &user.username)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .get_user_by_username(&req.username)?
        .ok_or(ApiError::Unauthorized)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| anyhow::anyhow!("stored password hash unreadable: {}", e))?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let token = create_token(&state.jwt_secret, user.id, &user.username)?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .get_user(claims.sub)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(json!({ "user": UserResponse::from(user) })))
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

fn create_token(secret: &str, user_id: i64, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
