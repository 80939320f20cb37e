//! Authentication manager
//!
//! Owns the process-wide signing key and token TTL, injected once from
//! configuration at startup. Stateless beyond that: there is no session
//! table, the signed token is the only session artifact.

use sqlx::SqlitePool;

use super::jwt::{create_access_token, validate_access_token, AccessClaims, JwtError};
use super::password::verify_password;
use crate::core::config::AuthConfig;
use crate::data::repositories::user;
use crate::data::types::UserCredentials;
use crate::data::DataError;

/// Why an authentication attempt failed
#[derive(Debug)]
pub enum AuthenticateError {
    /// Unknown email or wrong password; callers report both identically
    InvalidCredentials,
    /// Storage failure unrelated to the credentials
    Data(DataError),
    /// Token signing failure
    Signing(anyhow::Error),
}

/// Main authentication manager
pub struct AuthManager {
    signing_key: Vec<u8>,
    token_ttl_minutes: u64,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            signing_key: config.signing_key.clone(),
            token_ttl_minutes: config.token_ttl_minutes,
        }
    }

    /// Validate credentials against the identity store and issue a token.
    ///
    /// Looks up the user by exact email; a missing row and a failed
    /// password verification are indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<(UserCredentials, String), AuthenticateError> {
        let creds = user::get_credentials_by_email(pool, email)
            .await
            .map_err(AuthenticateError::Data)?
            .ok_or(AuthenticateError::InvalidCredentials)?;

        if !verify_password(password, &creds.password_hash) {
            return Err(AuthenticateError::InvalidCredentials);
        }

        let token = self
            .issue_token(creds.user_id)
            .map_err(AuthenticateError::Signing)?;
        Ok((creds, token))
    }

    /// Sign a fresh access token for a user id
    pub fn issue_token(&self, user_id: i64) -> anyhow::Result<String> {
        create_access_token(&self.signing_key, user_id, self.token_ttl_minutes)
    }

    /// Validate a JWT access token
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        validate_access_token(token, &self.signing_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::password::hash_password;
    use crate::data::types::Role;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        sqlx::query(crate::data::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn manager() -> AuthManager {
        AuthManager::new(&AuthConfig {
            signing_key: vec![7u8; 32],
            token_ttl_minutes: 120,
        })
    }

    #[tokio::test]
    async fn test_authenticate_success_roundtrips_user_id() {
        let pool = setup_test_pool().await;
        let hash = hash_password("teacher123").unwrap();
        let created =
            user::create_user(&pool, "tom@school.edu", "Tom Teacher", Role::Teacher, &hash)
                .await
                .unwrap();

        let mgr = manager();
        let (creds, token) = mgr
            .authenticate(&pool, "tom@school.edu", "teacher123")
            .await
            .unwrap();
        assert_eq!(creds.user_id, created.user_id);

        let claims = mgr.validate_token(&token).unwrap();
        assert_eq!(claims.user_id(), Some(created.user_id));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_identical() {
        let pool = setup_test_pool().await;
        let hash = hash_password("teacher123").unwrap();
        user::create_user(&pool, "tom@school.edu", "Tom Teacher", Role::Teacher, &hash)
            .await
            .unwrap();

        let mgr = manager();
        let wrong_password = mgr
            .authenticate(&pool, "tom@school.edu", "nope")
            .await
            .unwrap_err();
        let unknown_email = mgr
            .authenticate(&pool, "ghost@school.edu", "teacher123")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthenticateError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthenticateError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_token_from_other_key_rejected() {
        let pool = setup_test_pool().await;
        let hash = hash_password("pw123456").unwrap();
        user::create_user(&pool, "a@s.edu", "A", Role::Student, &hash)
            .await
            .unwrap();

        let (_, token) = manager()
            .authenticate(&pool, "a@s.edu", "pw123456")
            .await
            .unwrap();

        let other = AuthManager::new(&AuthConfig {
            signing_key: vec![9u8; 32],
            token_ttl_minutes: 120,
        });
        assert!(other.validate_token(&token).is_err());
    }
}
