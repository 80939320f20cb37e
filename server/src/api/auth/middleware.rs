//! Authentication middleware
//!
//! The session resolver: every protected request carries
//! `Authorization: Bearer <jwt>`. The token's signature and expiry are
//! verified, the subject parsed, and the user row loaded; a token whose
//! user was deleted after issuance is as invalid as a forged one. On
//! success an `AuthContext` lands in the request extensions.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::context::AuthContext;
use super::jwt::JwtError;
use super::manager::AuthManager;
use crate::data::repositories::user;
use crate::data::Database;

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "AUTH_REQUIRED",
            message: "Not authenticated".to_string(),
        }
    }

    pub fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_EXPIRED",
            message: "Access token has expired".to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_INVALID",
            message: "Invalid access token".to_string(),
        }
    }

    pub fn unknown_user() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "USER_NOT_FOUND",
            message: "User not found".to_string(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "internal_error",
            code: "INTERNAL",
            message: "Database operation failed".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth_manager: Arc<AuthManager>,
    pub database: Arc<Database>,
}

/// Extract the bearer token from an Authorization header value
fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ").map(str::trim)
}

/// Authentication middleware
///
/// Injects `AuthContext` into request extensions on success.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(AuthError::required)?;

    let claims = state.auth_manager.validate_token(token).map_err(|e| match e {
        JwtError::Expired => AuthError::expired(),
        _ => AuthError::invalid(),
    })?;

    // Unverified claims are never trusted; a malformed subject in a
    // correctly-signed token is still a 401.
    let user_id = claims.user_id().ok_or_else(AuthError::invalid)?;

    let row = user::get_user(state.database.pool(), user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "User lookup failed during auth");
            AuthError::internal()
        })?
        .ok_or_else(AuthError::unknown_user)?;

    let auth_ctx = AuthContext {
        user_id: row.user_id,
        role: row.role,
    };
    request.extensions_mut().insert(auth_ctx);

    Ok(next.run(request).await)
}
