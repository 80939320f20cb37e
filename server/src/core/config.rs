//! Application configuration
//!
//! All configuration is read once at startup from environment variables
//! (with CLI overrides) and never mutated afterwards. The JWT signing
//! secret is injected into the auth manager from here; nothing reads it
//! ad hoc at request time.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::cli::CliConfig;
use super::constants::{
    DEFAULT_CORS_ORIGINS, DEFAULT_DATABASE_PATH, DEFAULT_HOST, DEFAULT_JWT_EXPIRE_MIN,
    DEFAULT_PORT, DEFAULT_UPLOAD_DIR, ENV_CORS_ORIGINS, ENV_DATABASE_PATH, ENV_JWT_EXPIRE_MIN,
    ENV_JWT_SECRET, ENV_UPLOAD_DIR,
};
use crate::utils::crypto;

/// Server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing key for access tokens
    pub signing_key: Vec<u8>,
    /// Access-token TTL in minutes
    pub token_ttl_minutes: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the signing key
        f.debug_struct("AuthConfig")
            .field("signing_key", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Root directory for uploaded material files
    pub upload_dir: PathBuf,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables with CLI overrides
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let host = cli
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.unwrap_or(DEFAULT_PORT);

        let database_path = env::var(ENV_DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH));

        let upload_dir = env::var(ENV_UPLOAD_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let signing_key = match env::var(ENV_JWT_SECRET) {
            Ok(secret) if !secret.trim().is_empty() => secret.into_bytes(),
            _ => {
                tracing::warn!(
                    "{} is not set; using a random per-process signing key \
                     (sessions will not survive a restart)",
                    ENV_JWT_SECRET
                );
                crypto::generate_signing_key()
            }
        };

        let token_ttl_minutes = match env::var(ENV_JWT_EXPIRE_MIN) {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("{} must be a positive integer", ENV_JWT_EXPIRE_MIN))?,
            Err(_) => DEFAULT_JWT_EXPIRE_MIN,
        };

        let cors_origins = match env::var(ENV_CORS_ORIGINS) {
            Ok(v) => v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                signing_key,
                token_ttl_minutes,
            },
            database_path,
            upload_dir,
            cors_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_debug_redacts_key() {
        let config = AuthConfig {
            signing_key: b"super-secret".to_vec(),
            token_ttl_minutes: 120,
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super-secret"));
    }
}
