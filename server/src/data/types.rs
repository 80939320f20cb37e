//! Shared row types and enums for the data layer

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Role
// ============================================================================

/// Account role. Exact-match comparisons only; there is no role hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "teacher" => Some(Self::Teacher),
            "student" => Some(Self::Student),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Weekday
// ============================================================================

/// Day of week for timetable entries, stored as its English name
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
    sqlx::Type,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.as_str() == s)
    }

    /// Monday-first position, used to order week views
    pub fn order(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// User types
// ============================================================================

/// User row from database (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Login-only view of a user, including the stored password hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub password_hash: String,
}

// ============================================================================
// Profile types
// ============================================================================

/// Student profile row, linked 1:1 to a user via `user_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRow {
    pub student_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub grade: Option<String>,
    pub section: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Teacher profile row, linked 1:1 to a user via `user_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherRow {
    pub teacher_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub subject: Option<String>,
    pub department: Option<String>,
    pub employee_code: Option<String>,
    pub phone: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// ============================================================================
// Class types
// ============================================================================

/// Class (course) row referenced by timetable entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRow {
    pub class_id: i64,
    pub class_name: String,
}

// ============================================================================
// Timetable types
// ============================================================================

/// Timetable entry row; student and teacher references are user ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntryRow {
    pub entry_id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub day_of_week: Weekday,
    /// "HH:MM", canonicalized at write time
    pub start_time: String,
    pub end_time: String,
    pub created_at: i64,
}

/// Joined timetable item for week views and chat replies
#[derive(Debug, Clone)]
pub struct TimetableItemRow {
    pub day: Weekday,
    pub start: String,
    pub end: String,
    pub subject: String,
    pub teacher: Option<String>,
}

// ============================================================================
// Notification types
// ============================================================================

/// Notification row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub sent_by: i64,
    pub sent_to: i64,
    pub message: String,
    pub sent_at: i64,
    pub is_read: bool,
}

// ============================================================================
// Material types
// ============================================================================

/// Teaching material row; `file_path` is relative to the upload root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRow {
    pub material_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub file_path: String,
    pub target_grade: String,
    pub target_section: Option<String>,
    pub created_at: i64,
}

/// Material plus uploader name, for the student-facing listing
#[derive(Debug, Clone)]
pub struct MaterialWithTeacher {
    pub material: MaterialRow,
    pub teacher_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Admin, Role::Teacher, Role::Student] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("Admin"), None); // case-sensitive
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_weekday_roundtrip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::parse(day.as_str()), Some(day));
        }
        assert_eq!(Weekday::parse("monday"), None);
    }

    #[test]
    fn test_weekday_order_is_monday_first() {
        assert_eq!(Weekday::Monday.order(), 0);
        assert_eq!(Weekday::Sunday.order(), 6);
        assert!(Weekday::Tuesday.order() < Weekday::Friday.order());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
