use api::{router, AppState};
use auth::AuthService;
use infolock_core::AppConfig;
use std::sync::Arc;
use store::CredentialStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod seed;

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // A deployment without a signing key must not come up; tokens are never
    // issued under a built-in fallback secret.
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let pool = match store::connect(&config.database.url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("failed to open credential store: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = store::init_schema(&pool).await {
        error!("failed to initialize schema: {e}");
        std::process::exit(1);
    }

    let credential_store = CredentialStore::new(pool);

    if let Err(e) = seed::seed_admin(&credential_store, config.auth.seed_admin.as_ref()).await {
        error!("admin seed failed: {e}");
        std::process::exit(1);
    }

    let auth_service = AuthService::new(
        credential_store.clone(),
        config.auth.jwt_secret.clone(),
        config.auth.token_ttl_seconds,
    );
    let state = Arc::new(AppState::new(credential_store, auth_service));
    let app = router::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!("listening on http://{addr}");
    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
