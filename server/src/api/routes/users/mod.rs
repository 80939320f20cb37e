//! User admin API endpoints (`/api/users`)
//!
//! Admin-only CRUD over the identity store. Creating here makes a bare
//! account with no profile row; the student/teacher endpoints are the way
//! to provision role-specific profiles atomically.

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::auth::password::hash_password;
use crate::api::auth::{AdminOnly, RoleGuard};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::repositories::user;
use crate::data::Database;

use types::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserDto};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub database: Arc<Database>,
}

/// Build Users API routes
pub fn routes(database: Arc<Database>) -> Router {
    let state = UsersApiState { database };

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{user_id}", patch(update_user).delete(delete_user))
        .with_state(state)
}

/// List users, optionally filtered by role
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Users ordered by id", body = [UserDto]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_users(
    State(state): State<UsersApiState>,
    _admin: RoleGuard<AdminOnly>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let rows = user::list_users(state.database.pool(), query.role, query.skip, query.limit)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(rows.into_iter().map(UserDto::from).collect()))
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_user(
    State(state): State<UsersApiState>,
    _admin: RoleGuard<AdminOnly>,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let hash = hash_password(&body.password)
        .map_err(|_| ApiError::internal("Password hashing failed"))?;

    let row = user::create_user(
        state.database.pool(),
        &body.email,
        &body.full_name,
        body.role,
        &hash,
    )
    .await
    .map_err(ApiError::from_data)?;

    Ok((StatusCode::CREATED, Json(UserDto::from(row))))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/api/users/{user_id}",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use, or role change blocked by a linked profile")
    )
)]
pub async fn update_user(
    State(state): State<UsersApiState>,
    _admin: RoleGuard<AdminOnly>,
    Path(user_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let hash = match &body.password {
        Some(password) => Some(
            hash_password(password).map_err(|_| ApiError::internal("Password hashing failed"))?,
        ),
        None => None,
    };

    let patch = user::UserPatch {
        email: body.email.as_deref(),
        full_name: body.full_name.as_deref(),
        role: body.role,
        password_hash: hash.as_deref(),
    };

    let row = user::update_user(state.database.pool(), user_id, patch)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))?;

    Ok(Json(UserDto::from(row)))
}

/// Delete a user (cascades any linked profile)
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "users",
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UsersApiState>,
    _admin: RoleGuard<AdminOnly>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = user::delete_user(state.database.pool(), user_id)
        .await
        .map_err(ApiError::from_data)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("USER_NOT_FOUND", "User not found"))
    }
}
