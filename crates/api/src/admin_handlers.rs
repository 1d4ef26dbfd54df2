use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth_handlers::MessageResponse;
use crate::error::{ApiError, ErrorResponse};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub user_id: i64,
    pub action: String,
    pub timestamp: String,
}

const ACTIVITY_FEED_LIMIT: i64 = 100;

/// GET /admin/users - all registered users, without credential hashes
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.store.list_users().await?;

    let summaries: Vec<UserSummary> = users
        .into_iter()
        .map(|u| UserSummary {
            id: u.id,
            name: u.name,
            email: u.email,
        })
        .collect();

    Ok(Json(summaries))
}

/// DELETE /admin/users/{id} - remove a user account
pub async fn remove_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Response, ApiError> {
    if !state.store.delete_user(user_id).await? {
        let error = ErrorResponse {
            error: format!("No user with id {user_id}"),
            code: "not_found",
        };
        return Ok((StatusCode::NOT_FOUND, Json(error)).into_response());
    }

    let response = MessageResponse {
        message: format!("User {user_id} removed"),
    };
    Ok(Json(response).into_response())
}

/// GET /admin/activity_logs - recent audit entries, newest first
pub async fn activity_logs(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.store.recent_activity(ACTIVITY_FEED_LIMIT).await?;

    let logs: Vec<ActivityResponse> = entries
        .into_iter()
        .map(|e| ActivityResponse {
            user_id: e.user_id,
            action: e.action,
            timestamp: e.timestamp.to_rfc3339(),
        })
        .collect();

    Ok(Json(logs))
}
