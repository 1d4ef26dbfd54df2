use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Signing key for bearer tokens. Mandatory: there is no fallback
    /// value, and an empty key fails [`AppConfig::validate`] at startup.
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: i64,
    /// Optional initial admin account, created at startup only while the
    /// admin collection is empty.
    #[serde(default)]
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_token_ttl() -> i64 {
    3600 // 1 hour
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Load configuration from infolock.toml in the current directory,
    /// with environment variable overrides.
    ///
    /// Environment variables use the INFOLOCK prefix with double-underscore
    /// section separators, e.g. INFOLOCK__DATABASE__URL,
    /// INFOLOCK__AUTH__JWT_SECRET.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("infolock").required(false))
            .add_source(config::Environment::with_prefix("INFOLOCK").separator("__"))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Reject a deployment that cannot sign tokens. Called by the loaders;
    /// a missing or blank signing key must abort startup, never degrade to
    /// some built-in fallback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set to a non-empty value".to_string(),
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "database.url must be set to a non-empty value".to_string(),
            ));
        }
        Ok(())
    }
}
