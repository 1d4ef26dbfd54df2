use crate::error::is_transient;
use crate::model::{ActivityEntry, Admin, User};
use crate::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Transient pool failures get one immediate retry before surfacing;
/// query errors are terminal and never retried.
macro_rules! retry_once {
    ($query:expr) => {{
        match $query {
            Err(ref e) if is_transient(e) => $query,
            first => first,
        }
    }};
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// Data access for identity records and the activity log.
///
/// Owns a pooled connection handle, injected at construction. Pure data
/// access; uniqueness checks and credential decisions live in the auth
/// service layer.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new user record. `password_hash` must already be hashed.
    pub async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let user = retry_once!(
            sqlx::query_as::<_, User>(
                "INSERT INTO users (name, email, password_hash, created_at) \
                 VALUES (?, ?, ?, ?) \
                 RETURNING id, name, email, password_hash, created_at",
            )
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
        )?;
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = retry_once!(
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
        )?;
        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = retry_once!(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
        )?;
        Ok(user)
    }

    pub async fn user_email_exists(&self, email: &str) -> Result<bool> {
        let exists = retry_once!(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = ?)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
        )?;
        Ok(exists)
    }

    /// All users, oldest first.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = retry_once!(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await
        )?;
        Ok(users)
    }

    /// Replace a user's profile fields. Returns the updated record, or
    /// `None` if no such user exists.
    pub async fn update_user_profile(
        &self,
        id: i64,
        name: &str,
        email: &str,
    ) -> Result<Option<User>> {
        let user = retry_once!(
            sqlx::query_as::<_, User>(
                "UPDATE users SET name = ?, email = ? WHERE id = ? \
                 RETURNING id, name, email, password_hash, created_at",
            )
            .bind(name)
            .bind(email)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
        )?;
        Ok(user)
    }

    /// Delete a user and (via cascade) their activity entries. Returns
    /// whether a record was removed.
    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        let result = retry_once!(
            sqlx::query("DELETE FROM users WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await
        )?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_admin(&self, name: &str, email: &str, password_hash: &str) -> Result<Admin> {
        let admin = retry_once!(
            sqlx::query_as::<_, Admin>(
                "INSERT INTO admins (name, email, password_hash, created_at) \
                 VALUES (?, ?, ?, ?) \
                 RETURNING id, name, email, password_hash, created_at",
            )
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
        )?;
        Ok(admin)
    }

    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = retry_once!(
            sqlx::query_as::<_, Admin>(&format!(
                "SELECT {USER_COLUMNS} FROM admins WHERE email = ?"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
        )?;
        Ok(admin)
    }

    pub async fn find_admin_by_id(&self, id: i64) -> Result<Option<Admin>> {
        let admin = retry_once!(
            sqlx::query_as::<_, Admin>(&format!("SELECT {USER_COLUMNS} FROM admins WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
        )?;
        Ok(admin)
    }

    pub async fn count_admins(&self) -> Result<i64> {
        let count = retry_once!(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
                .fetch_one(&self.pool)
                .await
        )?;
        Ok(count)
    }

    /// Append an audit entry for a user action.
    pub async fn record_activity(&self, user_id: i64, action: &str) -> Result<()> {
        retry_once!(
            sqlx::query("INSERT INTO activity_log (user_id, action, timestamp) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(action)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
        )?;
        Ok(())
    }

    /// Most recent activity entries, newest first.
    pub async fn recent_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>> {
        let entries = retry_once!(
            sqlx::query_as::<_, ActivityEntry>(
                "SELECT id, user_id, action, timestamp FROM activity_log \
                 ORDER BY timestamp DESC, id DESC LIMIT ?",
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        )?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    async fn test_store() -> CredentialStore {
        let pool = crate::connect("sqlite::memory:").await.unwrap();
        crate::init_schema(&pool).await.unwrap();
        CredentialStore::new(pool)
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let store = test_store().await;

        let created = store
            .create_user("Ann", "ann@x.com", "$argon2id$stub")
            .await
            .unwrap();
        assert_eq!(created.name, "Ann");
        assert!(created.id > 0);

        let by_email = store.find_user_by_email("ann@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = store.find_user_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ann@x.com");

        assert!(store.user_email_exists("ann@x.com").await.unwrap());
        assert!(!store.user_email_exists("bob@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn email_lookup_is_exact_match() {
        let store = test_store().await;
        store
            .create_user("Ann", "Ann@x.com", "$argon2id$stub")
            .await
            .unwrap();

        // No case normalization: a differently-cased email is a different key.
        assert!(store.find_user_by_email("ann@x.com").await.unwrap().is_none());
        assert!(store.find_user_by_email("Ann@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_email_violates_constraint() {
        let store = test_store().await;
        store
            .create_user("Ann", "ann@x.com", "$argon2id$stub")
            .await
            .unwrap();

        let err = store
            .create_user("Other", "ann@x.com", "$argon2id$other")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[tokio::test]
    async fn users_and_admins_are_disjoint_collections() {
        let store = test_store().await;
        store
            .create_user("Ann", "shared@x.com", "$argon2id$user")
            .await
            .unwrap();

        // The same email may exist in both collections independently.
        let admin = store
            .create_admin("Root", "shared@x.com", "$argon2id$admin")
            .await
            .unwrap();

        assert_eq!(store.count_admins().await.unwrap(), 1);
        let found = store
            .find_admin_by_email("shared@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, admin.id);
        assert_eq!(found.name, "Root");
    }

    #[tokio::test]
    async fn update_and_delete_user() {
        let store = test_store().await;
        let user = store
            .create_user("Ann", "ann@x.com", "$argon2id$stub")
            .await
            .unwrap();

        let updated = store
            .update_user_profile(user.id, "Ann B", "annb@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ann B");
        assert_eq!(updated.email, "annb@x.com");
        assert_eq!(updated.password_hash, user.password_hash);

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(!store.delete_user(user.id).await.unwrap());
        assert!(store.find_user_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn activity_log_records_and_lists_newest_first() {
        let store = test_store().await;
        let user = store
            .create_user("Ann", "ann@x.com", "$argon2id$stub")
            .await
            .unwrap();

        store.record_activity(user.id, "signup").await.unwrap();
        store.record_activity(user.id, "signin").await.unwrap();

        let entries = store.recent_activity(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "signin");
        assert_eq!(entries[1].action, "signup");

        let limited = store.recent_activity(1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }
}
