//! Authenticated request context and authorization checks
//!
//! `AuthContext` is what the session resolver injects after a token checks
//! out: the live user's id and role. Authorization is two rules applied
//! everywhere:
//!
//! - role checks are exact-match against an allowed set and always reject
//!   on mismatch; there is no grant-with-warning mode
//! - ownership checks compare the resource owner's user id with the
//!   context's, with admin bypassing ownership (never role) checks

use crate::api::types::ApiError;
use crate::data::types::Role;

/// Resolved identity attached to every authenticated request
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require the context's role to be in the allowed set
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden("FORBIDDEN", "Forbidden"))
        }
    }

    /// Require the context to own the resource; admins bypass this check
    pub fn require_owner(&self, owner_user_id: i64) -> Result<(), ApiError> {
        if self.is_admin() || self.user_id == owner_user_id {
            Ok(())
        } else {
            Err(ApiError::forbidden("NOT_OWNER", "Forbidden"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(user_id: i64, role: Role) -> AuthContext {
        AuthContext { user_id, role }
    }

    #[test]
    fn test_role_check_exact_membership() {
        let teacher = ctx(1, Role::Teacher);
        assert!(teacher.require_role(&[Role::Teacher, Role::Admin]).is_ok());
        assert!(teacher.require_role(&[Role::Student, Role::Admin]).is_err());
        assert!(teacher.require_role(&[]).is_err());
    }

    #[test]
    fn test_role_check_never_grants_admin_by_default() {
        // Admin is not ownership-style exempt from role checks: an
        // admin-excluded operation rejects admins too.
        let admin = ctx(1, Role::Admin);
        assert!(admin.require_role(&[Role::Student]).is_err());
        assert!(admin.require_role(&[Role::Student, Role::Admin]).is_ok());
    }

    #[test]
    fn test_owner_check_for_non_admin() {
        let student = ctx(7, Role::Student);
        assert!(student.require_owner(7).is_ok());
        assert!(student.require_owner(8).is_err());
    }

    #[test]
    fn test_admin_bypasses_ownership() {
        let admin = ctx(1, Role::Admin);
        assert!(admin.require_owner(999).is_ok());
    }
}
