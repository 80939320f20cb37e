//! Authorization extractors for Axum handlers
//!
//! These combine authentication (done by the middleware) with the role
//! gate into a single extraction step, so a handler's signature states its
//! allowed-role set:
//!
//! ```no_run
//! # use learnloop_server::api::auth::{RoleGuard, TeacherOrAdmin};
//! # use learnloop_server::api::types::ApiError;
//! pub async fn send_notification(
//!     auth: RoleGuard<TeacherOrAdmin>,
//! ) -> Result<(), ApiError> {
//!     let _sender = auth.ctx.user_id;
//!     Ok(())
//! }
//! ```

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::context::AuthContext;
use crate::api::types::ApiError;
use crate::data::types::Role;

// ============================================================================
// Role Markers
// ============================================================================

/// Marker trait for allowed-role sets
pub trait RoleSet: Send + Sync + 'static {
    /// Roles permitted through this guard
    const ALLOWED: &'static [Role];
}

/// Admin-only operations (user/student/teacher CRUD)
pub struct AdminOnly;
impl RoleSet for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Admin];
}

/// Teacher-facing operations; admin passes the role gate too
pub struct TeacherOrAdmin;
impl RoleSet for TeacherOrAdmin {
    const ALLOWED: &'static [Role] = &[Role::Teacher, Role::Admin];
}

/// Student-facing operations; admin passes the role gate too
pub struct StudentOrAdmin;
impl RoleSet for StudentOrAdmin {
    const ALLOWED: &'static [Role] = &[Role::Student, Role::Admin];
}

/// Strictly students; admin is deliberately excluded
pub struct StudentOnly;
impl RoleSet for StudentOnly {
    const ALLOWED: &'static [Role] = &[Role::Student];
}

// ============================================================================
// Auth Rejection
// ============================================================================

/// Rejection type for auth extractors
pub enum AuthRejection {
    /// Authorization failed
    Auth(ApiError),
    /// Auth context not available (middleware not applied)
    MissingContext,
}

impl From<ApiError> for AuthRejection {
    fn from(e: ApiError) -> Self {
        Self::Auth(e)
    }
}

impl axum::response::IntoResponse for AuthRejection {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Auth(e) => e.into_response(),
            Self::MissingContext => {
                ApiError::internal("Auth context not available").into_response()
            }
        }
    }
}

fn extract_context(parts: &Parts) -> Result<AuthContext, AuthRejection> {
    parts
        .extensions
        .get::<AuthContext>()
        .copied()
        .ok_or(AuthRejection::MissingContext)
}

// ============================================================================
// Extractors
// ============================================================================

/// Authenticated context with a role requirement baked into the type
pub struct RoleGuard<R: RoleSet> {
    pub ctx: AuthContext,
    _role: PhantomData<R>,
}

impl<S, R> FromRequestParts<S> for RoleGuard<R>
where
    S: Send + Sync,
    R: RoleSet,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = extract_context(parts)?;
        ctx.require_role(R::ALLOWED)?;
        Ok(Self {
            ctx,
            _role: PhantomData,
        })
    }
}

/// Simple authenticated context extractor, no role requirement.
///
/// For routes open to every logged-in user (e.g. `GET /api/auth/me`).
pub struct Auth {
    pub ctx: AuthContext,
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            ctx: extract_context(parts)?,
        })
    }
}
