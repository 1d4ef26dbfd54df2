//! Credential store for the InfoLock authentication service
//!
//! Provides functionality for:
//! - Persisting user and admin identity records
//! - Email-keyed lookups for authentication
//! - Profile updates and removal
//! - Appending and reading the activity log

pub mod error;
pub mod model;
pub mod schema;
pub mod service;

pub use error::StoreError;
pub use model::{ActivityEntry, Admin, User};
pub use schema::init_schema;
pub use service::CredentialStore;

pub use sqlx;
pub use sqlx::SqlitePool;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Open a connection pool for the given database URL.
///
/// The pool is the only store handle the rest of the system sees; it is
/// constructed once at startup and passed into [`CredentialStore::new`].
/// Acquisition is bounded so a saturated pool surfaces as
/// [`StoreError::Unavailable`] instead of hanging the request.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory SQLite database exists per connection; a single connection
    // keeps the schema visible across all calls.
    let max_connections = if url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}
