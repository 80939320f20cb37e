//! Material API endpoints (`/api/materials`)
//!
//! Upload is multipart and restricted to teacher/admin accounts that have a
//! teacher profile; the profile owns the rows. Students see materials
//! matching their grade, where a NULL target section means the whole grade.
//! Deleting a material removes the backing file best-effort and the row
//! unconditionally.

pub mod types;

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::auth::{RoleGuard, StudentOnly, TeacherOrAdmin};
use crate::api::types::ApiError;
use crate::data::repositories::{material, student, teacher};
use crate::data::{Database, MaterialStore};

use types::MaterialDto;

/// Shared state for Materials API endpoints
#[derive(Clone)]
pub struct MaterialsApiState {
    pub database: Arc<Database>,
    pub store: MaterialStore,
}

/// Build Materials API routes
pub fn routes(database: Arc<Database>, store: MaterialStore) -> Router {
    let state = MaterialsApiState { database, store };

    Router::new()
        .route("/", post(upload_material))
        .route("/mine", get(my_materials))
        .route("/for-me", get(materials_for_me))
        .route("/{material_id}", delete(delete_material))
        .with_state(state)
}

/// Collected multipart form fields for an upload
#[derive(Debug, Default)]
struct UploadForm {
    title: Option<String>,
    description: Option<String>,
    subject: Option<String>,
    target_grade: Option<String>,
    target_section: Option<String>,
    file_name: Option<String>,
    file_data: Option<Vec<u8>>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::bad_request("MULTIPART_ERROR", format!("Invalid multipart body: {}", e))
    })? {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(String::from);
                let data = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(
                        "MULTIPART_ERROR",
                        format!("Failed to read file field: {}", e),
                    )
                })?;
                form.file_data = Some(data.to_vec());
            }
            other => {
                let text = field.text().await.map_err(|e| {
                    ApiError::bad_request(
                        "MULTIPART_ERROR",
                        format!("Failed to read field {}: {}", other, e),
                    )
                })?;
                let value = Some(text);
                match other {
                    "title" => form.title = value,
                    "description" => form.description = value,
                    "subject" => form.subject = value,
                    "target_grade" => form.target_grade = value,
                    "target_section" => form.target_section = value,
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

/// Trim an optional value, mapping blank to None
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Upload a material targeted at a grade (and optionally a section)
#[utoipa::path(
    post,
    path = "/api/materials",
    tag = "materials",
    responses(
        (status = 201, description = "Material uploaded", body = MaterialDto),
        (status = 404, description = "Acting account has no teacher profile"),
        (status = 422, description = "Missing title, grade or file")
    )
)]
pub async fn upload_material(
    State(state): State<MaterialsApiState>,
    auth: RoleGuard<TeacherOrAdmin>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MaterialDto>), ApiError> {
    // Uploads are owned by teacher profiles. An admin without a linked
    // teacher profile is rejected, deliberately.
    let profile = teacher::get_by_user_id(state.database.pool(), auth.ctx.user_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| {
            ApiError::not_found("TEACHER_PROFILE_NOT_FOUND", "Teacher profile not found")
        })?;

    let form = read_upload_form(multipart).await?;

    let title = non_blank(form.title).ok_or_else(|| {
        ApiError::unprocessable("FIELD_EMPTY", "Title and target_grade are required")
    })?;
    let target_grade = non_blank(form.target_grade).ok_or_else(|| {
        ApiError::unprocessable("FIELD_EMPTY", "Title and target_grade are required")
    })?;
    let file_data = form.file_data.filter(|d| !d.is_empty()).ok_or_else(|| {
        ApiError::unprocessable("FILE_MISSING", "A non-empty file field is required")
    })?;
    let file_name = form.file_name.unwrap_or_default();

    let description = non_blank(form.description);
    let target_section = non_blank(form.target_section);
    // Subject falls back to the teacher's own subject
    let subject = non_blank(form.subject)
        .or_else(|| profile.subject.clone())
        .unwrap_or_else(|| "General".to_string());

    let file_path = state.store.store(&file_name, &file_data).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to store uploaded material");
        ApiError::internal("Failed to store uploaded file")
    })?;

    let row = material::create_material(
        state.database.pool(),
        material::NewMaterial {
            teacher_id: profile.teacher_id,
            title: &title,
            description: description.as_deref(),
            subject: Some(&subject),
            file_path: &file_path,
            target_grade: &target_grade,
            target_section: target_section.as_deref(),
        },
    )
    .await;

    let row = match row {
        Ok(row) => row,
        Err(e) => {
            // Row never landed; don't leave the file behind
            state.store.delete_best_effort(&file_path).await;
            return Err(ApiError::from_data(e));
        }
    };

    Ok((StatusCode::CREATED, Json(MaterialDto::from_row(row))))
}

/// The acting teacher's uploads, newest first
#[utoipa::path(
    get,
    path = "/api/materials/mine",
    tag = "materials",
    responses(
        (status = 200, description = "Own uploads", body = [MaterialDto]),
        (status = 404, description = "Acting account has no teacher profile")
    )
)]
pub async fn my_materials(
    State(state): State<MaterialsApiState>,
    auth: RoleGuard<TeacherOrAdmin>,
) -> Result<Json<Vec<MaterialDto>>, ApiError> {
    let profile = teacher::get_by_user_id(state.database.pool(), auth.ctx.user_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| {
            ApiError::not_found("TEACHER_PROFILE_NOT_FOUND", "Teacher profile not found")
        })?;

    let rows = material::list_by_teacher(state.database.pool(), profile.teacher_id)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(rows.into_iter().map(MaterialDto::from_row).collect()))
}

/// Materials visible to the logged-in student
#[utoipa::path(
    get,
    path = "/api/materials/for-me",
    tag = "materials",
    responses(
        (status = 200, description = "Matching materials", body = [MaterialDto]),
        (status = 403, description = "Students only"),
        (status = 404, description = "No student profile")
    )
)]
pub async fn materials_for_me(
    State(state): State<MaterialsApiState>,
    auth: RoleGuard<StudentOnly>,
) -> Result<Json<Vec<MaterialDto>>, ApiError> {
    let profile = student::get_by_user_id(state.database.pool(), auth.ctx.user_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| {
            ApiError::not_found("STUDENT_PROFILE_NOT_FOUND", "Student profile not found")
        })?;

    let grade = profile.grade.as_deref().unwrap_or("").trim().to_string();
    let section = profile.section.trim();
    let section = if section.is_empty() {
        None
    } else {
        Some(section)
    };

    let rows = material::list_for_student(state.database.pool(), &grade, section)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(
        rows.into_iter()
            .map(MaterialDto::from_row_with_teacher)
            .collect(),
    ))
}

/// Delete a material (owner teacher or admin)
#[utoipa::path(
    delete,
    path = "/api/materials/{material_id}",
    tag = "materials",
    responses(
        (status = 204, description = "Material deleted"),
        (status = 403, description = "Not the owner and not admin"),
        (status = 404, description = "Material not found")
    )
)]
pub async fn delete_material(
    State(state): State<MaterialsApiState>,
    auth: RoleGuard<TeacherOrAdmin>,
    Path(material_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let row = material::get_material(state.database.pool(), material_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("MATERIAL_NOT_FOUND", "Material not found"))?;

    if !auth.ctx.is_admin() {
        let profile = teacher::get_by_user_id(state.database.pool(), auth.ctx.user_id)
            .await
            .map_err(ApiError::from_data)?;
        match profile {
            Some(profile) if profile.teacher_id == row.teacher_id => {}
            _ => return Err(ApiError::forbidden("NOT_OWNER", "Forbidden")),
        }
    }

    // File removal is best-effort; the record delete proceeds regardless
    state.store.delete_best_effort(&row.file_path).await;

    material::delete_material(state.database.pool(), material_id)
        .await
        .map_err(ApiError::from_data)?;

    Ok(StatusCode::NO_CONTENT)
}
