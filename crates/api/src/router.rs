use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{
    admin_handlers, auth_handlers, middleware as auth_middleware, profile_handlers, AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(|| async { "InfoLock API running" }))
        .route("/signup", post(auth_handlers::signup))
        .route("/signin", post(auth_handlers::signin))
        .route("/admin/signin", post(auth_handlers::admin_signin));

    // Who-am-I: any verified principal
    let me_routes = Router::new()
        .route("/auth/me", get(profile_handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // Profile routes (require a user token)
    let profile_routes = Router::new()
        .route("/users/profile", get(profile_handlers::get_profile))
        .route("/users/profile", put(profile_handlers::update_profile))
        .route(
            "/users/profile",
            axum::routing::delete(profile_handlers::delete_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_user,
        ));

    // Admin routes (require an admin token)
    let admin_routes = Router::new()
        .route("/admin/users", get(admin_handlers::list_users))
        .route(
            "/admin/users/{id}",
            axum::routing::delete(admin_handlers::remove_user),
        )
        .route("/admin/activity_logs", get(admin_handlers::activity_logs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_admin,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(me_routes)
        .merge(profile_routes)
        .merge(admin_routes)
        .with_state(state)
}
