pub mod admin_handlers;
pub mod auth_handlers;
pub mod error;
pub mod middleware;
pub mod profile_handlers;
pub mod router;
pub mod state;

pub use state::AppState;
