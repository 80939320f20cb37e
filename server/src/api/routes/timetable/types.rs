//! Timetable API request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{TimetableEntryRow, Weekday};
use crate::domain::schedule::DaySchedule;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEntryRequest {
    pub student_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    /// Weekday name, e.g. "Monday"
    #[validate(length(min = 1, message = "day_of_week cannot be empty"))]
    pub day_of_week: String,
    /// "HH:MM"
    #[validate(length(min = 1, message = "start_time cannot be empty"))]
    pub start_time: String,
    /// "HH:MM"
    #[validate(length(min = 1, message = "end_time cannot be empty"))]
    pub end_time: String,
}

/// A persisted timetable entry
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryDto {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub day_of_week: Weekday,
    pub start_time: String,
    pub end_time: String,
}

impl From<TimetableEntryRow> for EntryDto {
    fn from(row: TimetableEntryRow) -> Self {
        Self {
            id: row.entry_id,
            student_id: row.student_id,
            teacher_id: row.teacher_id,
            class_id: row.class_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

/// One scheduled item in a day listing
#[derive(Debug, Serialize, ToSchema)]
pub struct WeekItemDto {
    pub subject: String,
    pub teacher: Option<String>,
    pub start: String,
    pub end: String,
}

/// One weekday's items
#[derive(Debug, Serialize, ToSchema)]
pub struct WeekDayDto {
    pub day: Weekday,
    pub items: Vec<WeekItemDto>,
}

impl From<DaySchedule> for WeekDayDto {
    fn from(day: DaySchedule) -> Self {
        Self {
            day: day.day,
            items: day
                .items
                .into_iter()
                .map(|i| WeekItemDto {
                    subject: i.subject,
                    teacher: i.teacher,
                    start: i.start,
                    end: i.end,
                })
                .collect(),
        }
    }
}

/// A student's full week, grouped by day
#[derive(Debug, Serialize, ToSchema)]
pub struct WeekResponse {
    pub student_id: i64,
    pub week: Vec<WeekDayDto>,
}
