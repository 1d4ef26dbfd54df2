use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. `password_hash` is the salted one-way hash of the
/// user's secret; the plaintext is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// An administrator. Same shape as [`User`] but a disjoint collection:
/// admin emails are unique among admins only, and admin lookups never
/// consult the user table (or vice versa).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One audit entry: which user did what, when.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityEntry {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}
