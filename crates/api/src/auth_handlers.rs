use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

// Absent JSON fields default to empty and take the same missing-field
// exit in the service as submitted-but-blank values.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AdminTokenResponse {
    pub token: String,
    pub name: String,
}

/// POST /signup - register a new user. No token is issued here; clients
/// sign in afterwards.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .auth
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    let response = MessageResponse {
        message: "User Registered Successfully".to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /signin - authenticate a user and return a bearer token
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (token, _user) = state
        .auth
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// POST /admin/signin - authenticate an admin. The admin dashboard greets
/// by name, so the name rides along with the token.
pub async fn admin_signin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (token, admin) = state
        .auth
        .login_admin(&payload.email, &payload.password)
        .await?;

    Ok(Json(AdminTokenResponse {
        token,
        name: admin.name,
    }))
}
