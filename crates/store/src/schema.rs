use crate::Result;
use sqlx::SqlitePool;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

const CREATE_ADMINS: &str = r#"
    CREATE TABLE IF NOT EXISTS admins (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

const CREATE_ACTIVITY_LOG: &str = r#"
    CREATE TABLE IF NOT EXISTS activity_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        action TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
    )
"#;

const CREATE_ACTIVITY_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_activity_log_user_id ON activity_log (user_id)";

/// Create the credential store tables if they do not exist yet.
///
/// Email uniqueness is enforced per collection by the UNIQUE constraints;
/// lookups are exact-match (SQLite's default BINARY collation), so no
/// case normalization happens anywhere.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_USERS).execute(pool).await?;
    sqlx::query(CREATE_ADMINS).execute(pool).await?;
    sqlx::query(CREATE_ACTIVITY_LOG).execute(pool).await?;
    sqlx::query(CREATE_ACTIVITY_USER_INDEX).execute(pool).await?;
    Ok(())
}
