use auth::{hash_password, Result};
use infolock_core::SeedAdmin;
use store::CredentialStore;
use tracing::info;

/// Create the initial admin account if one is configured and the admin
/// collection is still empty. Credentials come from deployment
/// configuration; there is no built-in default account.
pub async fn seed_admin(store: &CredentialStore, seed: Option<&SeedAdmin>) -> Result<()> {
    let Some(seed) = seed else {
        return Ok(());
    };

    if store.count_admins().await? > 0 {
        info!("admin account(s) already present, skipping seed");
        return Ok(());
    }

    let password_hash = hash_password(&seed.password)?;
    let admin = store
        .create_admin(&seed.name, &seed.email, &password_hash)
        .await?;

    info!(admin_id = admin.id, "seeded initial admin account");
    Ok(())
}
