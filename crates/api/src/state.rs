use auth::AuthService;
use store::CredentialStore;

/// Application state shared across all handlers
pub struct AppState {
    pub store: CredentialStore,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(store: CredentialStore, auth: AuthService) -> Self {
        Self { store, auth }
    }
}
