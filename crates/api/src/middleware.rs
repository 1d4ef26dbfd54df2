use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::error::{ApiError, ErrorResponse};
use crate::AppState;
use auth::{Claims, PrincipalKind};

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extract and verify the bearer token from the request headers.
///
/// A missing or malformed header is 401; a token that fails verification
/// (tampered, wrong key, expired) is 403 via the usual error mapping.
fn verified_claims(state: &AppState, headers: &HeaderMap) -> Result<Claims, Response> {
    let token = bearer_token(headers).ok_or_else(|| {
        let error = ErrorResponse {
            error: "Missing or invalid Authorization header".to_string(),
            code: "missing_token",
        };
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    })?;

    state
        .auth
        .authorize(token)
        .map_err(|e| ApiError(e).into_response())
}

fn wrong_kind(required: PrincipalKind) -> Response {
    let error = ErrorResponse {
        error: match required {
            PrincipalKind::User => "User access required".to_string(),
            PrincipalKind::Admin => "Admin access required".to_string(),
        },
        code: "forbidden",
    };
    (StatusCode::FORBIDDEN, Json(error)).into_response()
}

/// Middleware to require a verified token of any principal kind
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = verified_claims(&state, request.headers())?;

    // Store claims in request extensions for handlers to access
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Middleware to require a user token
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = verified_claims(&state, request.headers())?;

    if claims.kind != PrincipalKind::User {
        return Err(wrong_kind(PrincipalKind::User));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Middleware to require an admin token
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = verified_claims(&state, request.headers())?;

    if claims.kind != PrincipalKind::Admin {
        return Err(wrong_kind(PrincipalKind::Admin));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extractor for the verified claim set.
/// Use this in handlers behind one of the auth middlewares.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl<S> axum::extract::FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: "Not authenticated".to_string(),
                    code: "missing_token",
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
