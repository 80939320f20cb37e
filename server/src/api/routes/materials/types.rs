//! Material API response types

use serde::Serialize;
use utoipa::ToSchema;

use crate::data::types::{MaterialRow, MaterialWithTeacher};

/// Public view of a material
#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    /// URL path the file is served at
    pub file_url: String,
    pub target_grade: String,
    pub target_section: Option<String>,
    pub created_at: i64,
    /// Uploader's name, present on student-facing listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
}

impl MaterialDto {
    pub fn from_row(row: MaterialRow) -> Self {
        Self {
            id: row.material_id,
            title: row.title,
            description: row.description,
            subject: row.subject,
            file_url: format!("/uploads/{}", row.file_path),
            target_grade: row.target_grade,
            target_section: row.target_section,
            created_at: row.created_at,
            teacher: None,
        }
    }

    pub fn from_row_with_teacher(row: MaterialWithTeacher) -> Self {
        let mut dto = Self::from_row(row.material);
        dto.teacher = row.teacher_name;
        dto
    }
}
