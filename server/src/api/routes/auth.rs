//! Authentication API endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::{Auth, AuthManager, AuthenticateError};
use crate::api::extractors::ValidatedJson;
use crate::api::routes::users::types::UserDto;
use crate::api::types::ApiError;
use crate::data::repositories::user;
use crate::data::Database;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserDto,
    pub access_token: String,
    pub token_type: &'static str,
}

/// Auth state with database access
#[derive(Clone)]
pub struct AuthRoutesState {
    pub auth_manager: Arc<AuthManager>,
    pub database: Arc<Database>,
}

/// Public auth routes (no session required)
pub fn routes(auth_manager: Arc<AuthManager>, database: Arc<Database>) -> Router {
    let state = AuthRoutesState {
        auth_manager,
        database,
    };

    Router::new().route("/login", post(login)).with_state(state)
}

/// Session-protected auth routes
pub fn protected_routes(database: Arc<Database>) -> Router {
    let state = MeState { database };
    Router::new().route("/me", get(me)).with_state(state)
}

#[derive(Clone)]
pub struct MeState {
    pub database: Arc<Database>,
}

/// Log in with email and password, receiving a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AuthRoutesState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (creds, token) = state
        .auth_manager
        .authenticate(state.database.pool(), &request.email, &request.password)
        .await
        .map_err(|e| match e {
            AuthenticateError::InvalidCredentials => {
                ApiError::unauthorized("INVALID_CREDENTIALS", "Invalid email or password")
            }
            AuthenticateError::Data(e) => ApiError::from_data(e),
            AuthenticateError::Signing(e) => {
                tracing::error!(error = %e, "Token signing failed");
                ApiError::internal("Authentication failed")
            }
        })?;

    Ok(Json(LoginResponse {
        user: UserDto {
            id: creds.user_id,
            email: creds.email,
            name: creds.full_name,
            role: creds.role,
        },
        access_token: token,
        token_type: "bearer",
    }))
}

/// The logged-in user's identity
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(State(state): State<MeState>, auth: Auth) -> Result<Json<UserDto>, ApiError> {
    let row = user::get_user(state.database.pool(), auth.ctx.user_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::unauthorized("USER_NOT_FOUND", "User not found"))?;

    Ok(Json(UserDto::from(row)))
}
