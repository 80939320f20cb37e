//! Timetable API endpoints (`/api/timetable`)
//!
//! Creation is teacher/admin; a non-admin teacher may only create entries
//! naming themself as the teacher. Validation order: times well-formed and
//! start < end (422), referenced rows exist (404), no overlap for the same
//! student and weekday (409).

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveTime;

use crate::api::auth::{Auth, RoleGuard, TeacherOrAdmin};
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::data::repositories::timetable::{self, CreateEntryResult};
use crate::data::types::{Role, Weekday};
use crate::data::Database;
use crate::domain::schedule;

use types::{CreateEntryRequest, EntryDto, WeekDayDto, WeekResponse};

/// Shared state for Timetable API endpoints
#[derive(Clone)]
pub struct TimetableApiState {
    pub database: Arc<Database>,
}

/// Build Timetable API routes
pub fn routes(database: Arc<Database>) -> Router {
    let state = TimetableApiState { database };

    Router::new()
        .route("/", post(create_entry))
        .route("/{student_id}", get(get_week))
        .with_state(state)
}

fn parse_time(value: &str, field: &str) -> Result<NaiveTime, ApiError> {
    schedule::parse_hhmm(value.trim()).ok_or_else(|| {
        ApiError::unprocessable(
            "INVALID_TIME",
            format!("{} must be a time of day in HH:MM format", field),
        )
    })
}

/// Create a timetable entry
#[utoipa::path(
    post,
    path = "/api/timetable",
    tag = "timetable",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = EntryDto),
        (status = 403, description = "Teacher naming someone else as the teacher"),
        (status = 404, description = "Student, teacher or class not found"),
        (status = 409, description = "Overlapping slot for this student and day"),
        (status = 422, description = "Bad weekday/time, or start not before end")
    )
)]
pub async fn create_entry(
    State(state): State<TimetableApiState>,
    auth: RoleGuard<TeacherOrAdmin>,
    ValidatedJson(body): ValidatedJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryDto>), ApiError> {
    // A teacher schedules their own classes only; admin may name anyone
    auth.ctx.require_owner(body.teacher_id)?;

    let day = Weekday::parse(body.day_of_week.trim()).ok_or_else(|| {
        ApiError::unprocessable(
            "INVALID_WEEKDAY",
            "day_of_week must be a weekday name, e.g. \"Monday\"",
        )
    })?;
    let start = parse_time(&body.start_time, "start_time")?;
    let end = parse_time(&body.end_time, "end_time")?;
    if start >= end {
        return Err(ApiError::unprocessable(
            "INVALID_TIME_RANGE",
            "start_time must be before end_time",
        ));
    }

    let result = timetable::create_entry(
        state.database.pool(),
        timetable::NewEntry {
            student_id: body.student_id,
            teacher_id: body.teacher_id,
            class_id: body.class_id,
            day_of_week: day,
            start,
            end,
        },
    )
    .await
    .map_err(ApiError::from_data)?;

    let row = match result {
        CreateEntryResult::Created(row) => row,
        CreateEntryResult::MissingStudent => {
            return Err(ApiError::not_found("STUDENT_NOT_FOUND", "Student not found"));
        }
        CreateEntryResult::MissingTeacher => {
            return Err(ApiError::not_found("TEACHER_NOT_FOUND", "Teacher not found"));
        }
        CreateEntryResult::MissingClass => {
            return Err(ApiError::not_found("CLASS_NOT_FOUND", "Class not found"));
        }
        CreateEntryResult::Overlap => {
            return Err(ApiError::conflict(
                "SCHEDULE_OVERLAP",
                "This student already has a class in that time slot",
            ));
        }
    };

    Ok((StatusCode::CREATED, Json(EntryDto::from(row))))
}

/// A student's weekly timetable, grouped by weekday
#[utoipa::path(
    get,
    path = "/api/timetable/{student_id}",
    tag = "timetable",
    responses(
        (status = 200, description = "Week grouped Monday-first", body = WeekResponse),
        (status = 403, description = "Neither admin nor the owning student")
    )
)]
pub async fn get_week(
    State(state): State<TimetableApiState>,
    auth: Auth,
    Path(student_id): Path<i64>,
) -> Result<Json<WeekResponse>, ApiError> {
    // Admin can view any student's timetable; a student only their own
    let allowed = auth.ctx.is_admin()
        || (auth.ctx.role == Role::Student && auth.ctx.user_id == student_id);
    if !allowed {
        return Err(ApiError::forbidden("FORBIDDEN", "Forbidden"));
    }

    let items = timetable::list_for_student(state.database.pool(), student_id)
        .await
        .map_err(ApiError::from_data)?;

    let week = schedule::group_by_day(items)
        .into_iter()
        .map(WeekDayDto::from)
        .collect();

    Ok(Json(WeekResponse { student_id, week }))
}
