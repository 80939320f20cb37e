//! Student admin API endpoints (`/api/students`)
//!
//! Admin-only CRUD over student profiles. Create provisions the identity
//! and the profile as one transaction; update keeps mirrored name/email in
//! sync on both rows; delete removes both. The section field is required
//! and must be non-empty after trimming.

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::auth::password::hash_password;
use crate::api::auth::{AdminOnly, RoleGuard};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::repositories::student;
use crate::data::Database;

use types::{CreateStudentRequest, ListQuery, StudentDto, UpdateStudentRequest};

/// Shared state for Students API endpoints
#[derive(Clone)]
pub struct StudentsApiState {
    pub database: Arc<Database>,
}

/// Build Students API routes
pub fn routes(database: Arc<Database>) -> Router {
    let state = StudentsApiState { database };

    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/{student_id}",
            get(get_student).patch(update_student).delete(delete_student),
        )
        .with_state(state)
}

/// Require a non-empty value after trimming
fn require_trimmed<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::unprocessable(
            "FIELD_EMPTY",
            format!("{} must be a non-empty string", field),
        ));
    }
    Ok(trimmed)
}

/// List student profiles
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "students",
    responses(
        (status = 200, description = "Students ordered by id", body = [StudentDto]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_students(
    State(state): State<StudentsApiState>,
    _admin: RoleGuard<AdminOnly>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<Vec<StudentDto>>, ApiError> {
    let rows = student::list_students(state.database.pool(), query.skip, query.limit)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(rows.into_iter().map(StudentDto::from).collect()))
}

/// Get one student profile
#[utoipa::path(
    get,
    path = "/api/students/{student_id}",
    tag = "students",
    responses(
        (status = 200, description = "Student profile", body = StudentDto),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<StudentsApiState>,
    _admin: RoleGuard<AdminOnly>,
    Path(student_id): Path<i64>,
) -> Result<Json<StudentDto>, ApiError> {
    let row = student::get_student(state.database.pool(), student_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("STUDENT_NOT_FOUND", "Student not found"))?;

    Ok(Json(StudentDto::from(row)))
}

/// Create a student (identity + profile, atomically)
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentDto),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Blank section")
    )
)]
pub async fn create_student(
    State(state): State<StudentsApiState>,
    _admin: RoleGuard<AdminOnly>,
    ValidatedJson(body): ValidatedJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentDto>), ApiError> {
    let section = require_trimmed(&body.section, "class")?;
    let grade = body.grade.as_deref().map(str::trim).filter(|g| !g.is_empty());

    let hash = hash_password(&body.password)
        .map_err(|_| ApiError::internal("Password hashing failed"))?;

    let row = student::create_student(
        state.database.pool(),
        student::NewStudent {
            full_name: &body.full_name,
            email: &body.email,
            grade,
            section,
            password_hash: &hash,
        },
    )
    .await
    .map_err(ApiError::from_data)?;

    Ok((StatusCode::CREATED, Json(StudentDto::from(row))))
}

/// Partially update a student (mirrored fields update both rows)
#[utoipa::path(
    patch,
    path = "/api/students/{student_id}",
    tag = "students",
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentDto),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Blank section")
    )
)]
pub async fn update_student(
    State(state): State<StudentsApiState>,
    _admin: RoleGuard<AdminOnly>,
    Path(student_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<StudentDto>, ApiError> {
    let section = match &body.section {
        Some(section) => Some(require_trimmed(section, "class")?),
        None => None,
    };
    let grade = body.grade.as_deref().map(str::trim).filter(|g| !g.is_empty());

    let hash = match &body.password {
        Some(password) => Some(
            hash_password(password).map_err(|_| ApiError::internal("Password hashing failed"))?,
        ),
        None => None,
    };

    let row = student::update_student(
        state.database.pool(),
        student_id,
        student::StudentPatch {
            full_name: body.full_name.as_deref(),
            email: body.email.as_deref(),
            grade,
            section,
            password_hash: hash.as_deref(),
        },
    )
    .await
    .map_err(ApiError::from_data)?
    .ok_or_else(|| ApiError::not_found("STUDENT_NOT_FOUND", "Student not found"))?;

    Ok(Json(StudentDto::from(row)))
}

/// Delete a student (profile + identity, atomically)
#[utoipa::path(
    delete,
    path = "/api/students/{student_id}",
    tag = "students",
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(state): State<StudentsApiState>,
    _admin: RoleGuard<AdminOnly>,
    Path(student_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = student::delete_student(state.database.pool(), student_id)
        .await
        .map_err(ApiError::from_data)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("STUDENT_NOT_FOUND", "Student not found"))
    }
}
