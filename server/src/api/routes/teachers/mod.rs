//! Teacher admin API endpoints (`/api/teachers`)
//!
//! Same transactional CRUD shape as students. Phone numbers are normalized
//! and validated against the Australian format before anything persists.

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::auth::password::hash_password;
use crate::api::auth::{AdminOnly, RoleGuard};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::routes::students::types::ListQuery;
use crate::api::types::ApiError;
use crate::data::repositories::teacher;
use crate::data::Database;
use crate::domain::phone;

use types::{CreateTeacherRequest, TeacherDto, UpdateTeacherRequest};

/// Shared state for Teachers API endpoints
#[derive(Clone)]
pub struct TeachersApiState {
    pub database: Arc<Database>,
}

/// Build Teachers API routes
pub fn routes(database: Arc<Database>) -> Router {
    let state = TeachersApiState { database };

    Router::new()
        .route("/", get(list_teachers).post(create_teacher))
        .route(
            "/{teacher_id}",
            get(get_teacher).patch(update_teacher).delete(delete_teacher),
        )
        .with_state(state)
}

/// Normalize an optional phone input, rejecting invalid formats.
/// Empty strings are treated as "not provided".
fn normalized_phone(input: Option<&str>) -> Result<Option<String>, ApiError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => phone::normalize_au_phone(raw).map(Some).ok_or_else(|| {
            ApiError::unprocessable(
                "INVALID_PHONE",
                "Phone must be Australian format: +61 followed by 9 digits (e.g., +61412345678)",
            )
        }),
    }
}

/// List teacher profiles
#[utoipa::path(
    get,
    path = "/api/teachers",
    tag = "teachers",
    responses(
        (status = 200, description = "Teachers ordered by id", body = [TeacherDto]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_teachers(
    State(state): State<TeachersApiState>,
    _admin: RoleGuard<AdminOnly>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<Vec<TeacherDto>>, ApiError> {
    let rows = teacher::list_teachers(state.database.pool(), query.skip, query.limit)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(rows.into_iter().map(TeacherDto::from).collect()))
}

/// Get one teacher profile
#[utoipa::path(
    get,
    path = "/api/teachers/{teacher_id}",
    tag = "teachers",
    responses(
        (status = 200, description = "Teacher profile", body = TeacherDto),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn get_teacher(
    State(state): State<TeachersApiState>,
    _admin: RoleGuard<AdminOnly>,
    Path(teacher_id): Path<i64>,
) -> Result<Json<TeacherDto>, ApiError> {
    let row = teacher::get_teacher(state.database.pool(), teacher_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("TEACHER_NOT_FOUND", "Teacher not found"))?;

    Ok(Json(TeacherDto::from(row)))
}

/// Create a teacher (identity + profile, atomically)
#[utoipa::path(
    post,
    path = "/api/teachers",
    tag = "teachers",
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = TeacherDto),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Invalid phone format")
    )
)]
pub async fn create_teacher(
    State(state): State<TeachersApiState>,
    _admin: RoleGuard<AdminOnly>,
    ValidatedJson(body): ValidatedJson<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherDto>), ApiError> {
    let phone = normalized_phone(body.phone.as_deref())?;

    let hash = hash_password(&body.password)
        .map_err(|_| ApiError::internal("Password hashing failed"))?;

    let row = teacher::create_teacher(
        state.database.pool(),
        teacher::NewTeacher {
            full_name: &body.full_name,
            email: &body.email,
            subject: body.subject.as_deref(),
            department: body.department.as_deref(),
            employee_code: body.employee_code.as_deref(),
            phone: phone.as_deref(),
            password_hash: &hash,
        },
    )
    .await
    .map_err(ApiError::from_data)?;

    Ok((StatusCode::CREATED, Json(TeacherDto::from(row))))
}

/// Partially update a teacher (mirrored fields update both rows)
#[utoipa::path(
    patch,
    path = "/api/teachers/{teacher_id}",
    tag = "teachers",
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherDto),
        (status = 404, description = "Teacher not found"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Invalid phone format")
    )
)]
pub async fn update_teacher(
    State(state): State<TeachersApiState>,
    _admin: RoleGuard<AdminOnly>,
    Path(teacher_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<UpdateTeacherRequest>,
) -> Result<Json<TeacherDto>, ApiError> {
    let phone = normalized_phone(body.phone.as_deref())?;

    let hash = match &body.password {
        Some(password) => Some(
            hash_password(password).map_err(|_| ApiError::internal("Password hashing failed"))?,
        ),
        None => None,
    };

    let row = teacher::update_teacher(
        state.database.pool(),
        teacher_id,
        teacher::TeacherPatch {
            full_name: body.full_name.as_deref(),
            email: body.email.as_deref(),
            subject: body.subject.as_deref(),
            department: body.department.as_deref(),
            employee_code: body.employee_code.as_deref(),
            phone: phone.as_deref(),
            password_hash: hash.as_deref(),
        },
    )
    .await
    .map_err(ApiError::from_data)?
    .ok_or_else(|| ApiError::not_found("TEACHER_NOT_FOUND", "Teacher not found"))?;

    Ok(Json(TeacherDto::from(row)))
}

/// Delete a teacher (profile + identity, atomically)
#[utoipa::path(
    delete,
    path = "/api/teachers/{teacher_id}",
    tag = "teachers",
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn delete_teacher(
    State(state): State<TeachersApiState>,
    _admin: RoleGuard<AdminOnly>,
    Path(teacher_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = teacher::delete_teacher(state.database.pool(), teacher_id)
        .await
        .map_err(ApiError::from_data)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("TEACHER_NOT_FOUND", "Teacher not found"))
    }
}
