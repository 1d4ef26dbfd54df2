use crate::{
    error::{AuthError, Result},
    jwt::{issue_token, verify_token, Claims, PrincipalKind},
    password::{hash_password, verify_password},
};
use chrono::Utc;
use store::{Admin, CredentialStore, User};

/// Orchestrates one authentication attempt: field validation, lookup in
/// the correct collection, secret check, token issuance. Every exit before
/// issuance is a rejection; lookup and secret failures are deliberately
/// indistinguishable from the outside.
pub struct AuthService {
    store: CredentialStore,
    jwt_secret: String,
    token_ttl_seconds: i64,
}

impl AuthService {
    /// Create a new AuthService
    ///
    /// # Arguments
    /// * `store` - Credential store handle, constructed at process start
    /// * `jwt_secret` - Signing key; configured, validated at startup, never logged
    /// * `token_ttl_seconds` - Token lifetime (default: 3600 for 1 hour)
    pub fn new(store: CredentialStore, jwt_secret: String, token_ttl_seconds: i64) -> Self {
        Self {
            store,
            jwt_secret,
            token_ttl_seconds,
        }
    }

    /// Register a new user.
    ///
    /// Rejects empty fields and already-registered emails. The secret is
    /// hashed before anything is persisted. No token is issued here;
    /// issuance is authentication's job, so clients sign in explicitly
    /// after registering.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        require_field(name, "name")?;
        require_field(email, "email")?;
        require_field(password, "password")?;

        if self.store.user_email_exists(email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_password(password)?;
        let user = self.store.create_user(name, email, &password_hash).await?;

        // Best-effort audit entry; a logging failure never fails the request
        let _ = self.store.record_activity(user.id, "signup").await;

        Ok(user)
    }

    /// Authenticate a user and mint a bearer token for them.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User)> {
        require_field(email, "email")?;
        require_field(password, "password")?;

        // Unknown email and wrong password take the same exit
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let claims = Claims::new(
            user.id.to_string(),
            PrincipalKind::User,
            user.name.clone(),
            Utc::now(),
            self.token_ttl_seconds,
        );
        let token = issue_token(&claims, &self.jwt_secret)?;

        let _ = self.store.record_activity(user.id, "signin").await;

        Ok((token, user))
    }

    /// Authenticate an admin against the admin collection only.
    pub async fn login_admin(&self, email: &str, password: &str) -> Result<(String, Admin)> {
        require_field(email, "email")?;
        require_field(password, "password")?;

        let admin = self
            .store
            .find_admin_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &admin.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let claims = Claims::new(
            admin.id.to_string(),
            PrincipalKind::Admin,
            admin.name.clone(),
            Utc::now(),
            self.token_ttl_seconds,
        );
        let token = issue_token(&claims, &self.jwt_secret)?;

        Ok((token, admin))
    }

    /// Validate a bearer token and yield its claim set. Pure token check;
    /// no store round trip and no revocation list.
    pub fn authorize(&self, token: &str) -> Result<Claims> {
        verify_token(token, &self.jwt_secret, Utc::now())
    }

    /// Resolve the user record behind a verified claim set.
    ///
    /// A token for a principal that no longer exists (or for an admin) does
    /// not authorize user resources.
    pub async fn current_user(&self, claims: &Claims) -> Result<User> {
        if claims.kind != PrincipalKind::User {
            return Err(AuthError::TokenInvalid);
        }
        let id: i64 = claims.sub.parse().map_err(|_| AuthError::TokenInvalid)?;

        self.store
            .find_user_by_id(id)
            .await?
            .ok_or(AuthError::TokenInvalid)
    }

    /// Resolve the admin record behind a verified claim set.
    pub async fn current_admin(&self, claims: &Claims) -> Result<Admin> {
        if claims.kind != PrincipalKind::Admin {
            return Err(AuthError::TokenInvalid);
        }
        let id: i64 = claims.sub.parse().map_err(|_| AuthError::TokenInvalid)?;

        self.store
            .find_admin_by_id(id)
            .await?
            .ok_or(AuthError::TokenInvalid)
    }

    /// Update a user's profile fields, keeping per-collection email
    /// uniqueness intact. The credential hash is untouched.
    pub async fn update_profile(&self, user_id: i64, name: &str, email: &str) -> Result<User> {
        require_field(name, "name")?;
        require_field(email, "email")?;

        let current = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if email != current.email && self.store.user_email_exists(email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        self.store
            .update_user_profile(user_id, name, email)
            .await?
            .ok_or(AuthError::TokenInvalid)
    }

    /// Remove a user's account.
    pub async fn delete_account(&self, user_id: i64) -> Result<()> {
        if !self.store.delete_user(user_id).await? {
            return Err(AuthError::TokenInvalid);
        }
        Ok(())
    }
}

fn require_field(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_for_jwt";

    async fn test_service() -> AuthService {
        let pool = store::connect("sqlite::memory:").await.unwrap();
        store::init_schema(&pool).await.unwrap();
        AuthService::new(CredentialStore::new(pool), SECRET.to_string(), 3600)
    }

    fn service_store(service: &AuthService) -> &CredentialStore {
        &service.store
    }

    #[tokio::test]
    async fn register_then_login() {
        let service = test_service().await;

        let user = service
            .register("Ann", "ann@x.com", "Secret123!")
            .await
            .unwrap();
        assert_eq!(user.email, "ann@x.com");
        assert_ne!(user.password_hash, "Secret123!");

        let (token, logged_in) = service.login_user("ann@x.com", "Secret123!").await.unwrap();
        assert!(!token.is_empty());
        assert_eq!(logged_in.id, user.id);

        // The token's claims decode back to the same principal
        let claims = service.authorize(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.kind, PrincipalKind::User);
        assert_eq!(claims.name, "Ann");

        let resolved = service.current_user(&claims).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_registration_leaves_record_untouched() {
        let service = test_service().await;

        let original = service
            .register("Ann", "ann@x.com", "Secret123!")
            .await
            .unwrap();

        let err = service
            .register("Impostor", "ann@x.com", "Other456!")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));

        // Stored record is unchanged: original credentials still work
        let stored = service_store(&service)
            .find_user_by_email("ann@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.name, "Ann");
        assert_eq!(stored.password_hash, original.password_hash);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let service = test_service().await;
        service
            .register("Ann", "ann@x.com", "Secret123!")
            .await
            .unwrap();

        let wrong_password = service.login_user("ann@x.com", "wrong").await.unwrap_err();
        let unknown_email = service
            .login_user("nobody@x.com", "Secret123!")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn empty_fields_are_rejected_before_lookup() {
        let service = test_service().await;

        let err = service.register("", "ann@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("name")));

        let err = service.login_user("ann@x.com", "").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("password")));

        let err = service.login_user("   ", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("email")));
    }

    #[tokio::test]
    async fn admin_login_uses_the_admin_collection_only() {
        let service = test_service().await;
        let store = service_store(&service);

        // Same email registered as a user must not grant admin access
        service
            .register("Ann", "ann@x.com", "Secret123!")
            .await
            .unwrap();
        let err = service.login_admin("ann@x.com", "Secret123!").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let hash = hash_password("RootPw789!").unwrap();
        store.create_admin("Root", "root@x.com", &hash).await.unwrap();

        let (token, admin) = service.login_admin("root@x.com", "RootPw789!").await.unwrap();
        let claims = service.authorize(&token).unwrap();
        assert_eq!(claims.kind, PrincipalKind::Admin);
        assert_eq!(claims.sub, admin.id.to_string());

        // An admin token does not resolve to a user
        assert!(service.current_user(&claims).await.is_err());
        assert_eq!(service.current_admin(&claims).await.unwrap().id, admin.id);
    }

    #[tokio::test]
    async fn successful_logins_append_activity() {
        let service = test_service().await;
        let user = service
            .register("Ann", "ann@x.com", "Secret123!")
            .await
            .unwrap();
        service.login_user("ann@x.com", "Secret123!").await.unwrap();

        let entries = service_store(&service).recent_activity(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "signin");
        assert_eq!(entries[0].user_id, user.id);
        assert_eq!(entries[1].action, "signup");
    }

    #[tokio::test]
    async fn failed_logins_do_not_append_activity() {
        let service = test_service().await;
        service
            .register("Ann", "ann@x.com", "Secret123!")
            .await
            .unwrap();
        let before = service_store(&service).recent_activity(10).await.unwrap().len();

        let _ = service.login_user("ann@x.com", "wrong").await;
        let _ = service.login_user("ghost@x.com", "wrong").await;

        let after = service_store(&service).recent_activity(10).await.unwrap().len();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn profile_update_respects_email_uniqueness() {
        let service = test_service().await;
        let ann = service
            .register("Ann", "ann@x.com", "Secret123!")
            .await
            .unwrap();
        service
            .register("Bob", "bob@x.com", "Other456!")
            .await
            .unwrap();

        let err = service
            .update_profile(ann.id, "Ann", "bob@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));

        let updated = service
            .update_profile(ann.id, "Ann B", "annb@x.com")
            .await
            .unwrap();
        assert_eq!(updated.name, "Ann B");
        assert_eq!(updated.email, "annb@x.com");
        // Credential hash survives profile edits
        assert_eq!(updated.password_hash, ann.password_hash);
    }

    #[tokio::test]
    async fn deleted_account_cannot_resolve_claims() {
        let service = test_service().await;
        service
            .register("Ann", "ann@x.com", "Secret123!")
            .await
            .unwrap();
        let (token, user) = service.login_user("ann@x.com", "Secret123!").await.unwrap();

        service.delete_account(user.id).await.unwrap();

        // The token still verifies (no revocation list), but the principal
        // behind it is gone.
        let claims = service.authorize(&token).unwrap();
        assert!(matches!(
            service.current_user(&claims).await.unwrap_err(),
            AuthError::TokenInvalid
        ));
    }
}
