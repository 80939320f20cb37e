//! Student API request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{Role, StudentRow};

/// Public view of a student profile
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDto {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub grade: Option<String>,
    pub section: String,
}

impl From<StudentRow> for StudentDto {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.student_id,
            full_name: row.full_name,
            email: row.email,
            role: Role::Student,
            grade: row.grade,
            section: row.section,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(max = 20, message = "Grade must be at most 20 characters"))]
    pub grade: Option<String>,
    #[validate(length(max = 20, message = "Section must be at most 20 characters"))]
    pub section: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Grade must be at most 20 characters"))]
    pub grade: Option<String>,
    #[validate(length(max = 20, message = "Section must be at most 20 characters"))]
    pub section: Option<String>,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: u32,
}

fn default_limit() -> u32 {
    crate::core::constants::DEFAULT_LIST_LIMIT
}
