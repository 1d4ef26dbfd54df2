use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth_handlers::MessageResponse;
use crate::error::ApiError;
use crate::middleware::AuthClaims;
use crate::AppState;
use auth::PrincipalKind;

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub id: String,
    pub kind: PrincipalKind,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// GET /auth/me - echo the verified claim set.
///
/// Clients ask the server who they are instead of decoding the token
/// themselves.
pub async fn me(AuthClaims(claims): AuthClaims) -> impl IntoResponse {
    Json(WhoAmIResponse {
        id: claims.sub,
        kind: claims.kind,
        name: claims.name,
    })
}

/// GET /users/profile - the authenticated user's profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthClaims(claims): AuthClaims,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.current_user(&claims).await?;

    Ok(Json(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}

/// PUT /users/profile - update name and email
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.current_user(&claims).await?;
    let updated = state
        .auth
        .update_profile(user.id, &payload.name, &payload.email)
        .await?;

    Ok(Json(ProfileResponse {
        id: updated.id,
        name: updated.name,
        email: updated.email,
    }))
}

/// DELETE /users/profile - remove the authenticated user's account
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    AuthClaims(claims): AuthClaims,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.current_user(&claims).await?;
    state.auth.delete_account(user.id).await?;

    Ok(Json(MessageResponse {
        message: "Account deleted".to_string(),
    }))
}
