//! Teacher API request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{Role, TeacherRow};

/// Public view of a teacher profile
#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherDto {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub subject: Option<String>,
    pub department: Option<String>,
    pub employee_code: Option<String>,
    pub phone: Option<String>,
}

impl From<TeacherRow> for TeacherDto {
    fn from(row: TeacherRow) -> Self {
        Self {
            id: row.teacher_id,
            full_name: row.full_name,
            email: row.email,
            role: Role::Teacher,
            subject: row.subject,
            department: row.department,
            employee_code: row.employee_code,
            phone: row.phone,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(max = 100, message = "Subject must be at most 100 characters"))]
    pub subject: Option<String>,
    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,
    #[validate(length(max = 50, message = "Employee code must be at most 50 characters"))]
    pub employee_code: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 100, message = "Subject must be at most 100 characters"))]
    pub subject: Option<String>,
    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,
    #[validate(length(max = 50, message = "Employee code must be at most 50 characters"))]
    pub employee_code: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: Option<String>,
}
