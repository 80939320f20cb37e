//! Notification API endpoints
//!
//! Students read and mark their own notifications at `/api/notifications`;
//! teachers and admins send at `/api/teacher/notifications/send`, either to
//! one student or fanned out to the whole school in one transaction.

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::{RoleGuard, StudentOnly, TeacherOrAdmin};
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::data::repositories::{notification, student};
use crate::data::Database;

use types::{
    MarkReadRequest, MarkReadResponse, NotificationDto, SendNotificationRequest,
    SendNotificationResponse,
};

/// Shared state for Notification API endpoints
#[derive(Clone)]
pub struct NotificationsApiState {
    pub database: Arc<Database>,
}

/// Student-facing routes (`/api/notifications`)
pub fn routes(database: Arc<Database>) -> Router {
    let state = NotificationsApiState { database };

    Router::new()
        .route("/", get(list_notifications))
        .route("/unread", get(list_unread))
        .route("/mark-read", post(mark_read))
        .with_state(state)
}

/// Sender-facing routes (`/api/teacher/notifications`)
pub fn sender_routes(database: Arc<Database>) -> Router {
    let state = NotificationsApiState { database };

    Router::new()
        .route("/send", post(send_notification))
        .with_state(state)
}

/// The student's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "Own notifications", body = [NotificationDto]),
        (status = 403, description = "Students only")
    )
)]
pub async fn list_notifications(
    State(state): State<NotificationsApiState>,
    auth: RoleGuard<StudentOnly>,
) -> Result<Json<Vec<NotificationDto>>, ApiError> {
    let rows = notification::list_for_user(state.database.pool(), auth.ctx.user_id, false)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(rows.into_iter().map(NotificationDto::from).collect()))
}

/// The student's unread notifications
#[utoipa::path(
    get,
    path = "/api/notifications/unread",
    tag = "notifications",
    responses(
        (status = 200, description = "Own unread notifications", body = [NotificationDto]),
        (status = 403, description = "Students only")
    )
)]
pub async fn list_unread(
    State(state): State<NotificationsApiState>,
    auth: RoleGuard<StudentOnly>,
) -> Result<Json<Vec<NotificationDto>>, ApiError> {
    let rows = notification::list_for_user(state.database.pool(), auth.ctx.user_id, true)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(rows.into_iter().map(NotificationDto::from).collect()))
}

/// Mark the student's notifications read (selected ids, or all)
#[utoipa::path(
    post,
    path = "/api/notifications/mark-read",
    tag = "notifications",
    request_body = MarkReadRequest,
    responses(
        (status = 200, description = "Rows marked", body = MarkReadResponse),
        (status = 403, description = "Students only")
    )
)]
pub async fn mark_read(
    State(state): State<NotificationsApiState>,
    auth: RoleGuard<StudentOnly>,
    ValidatedJson(body): ValidatedJson<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let marked = notification::mark_read(
        state.database.pool(),
        auth.ctx.user_id,
        body.ids.as_deref(),
    )
    .await
    .map_err(ApiError::from_data)?;

    Ok(Json(MarkReadResponse { marked }))
}

/// Send a notification to one student, or to every student
#[utoipa::path(
    post,
    path = "/api/teacher/notifications/send",
    tag = "notifications",
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Notification(s) sent", body = SendNotificationResponse),
        (status = 403, description = "Teacher or admin only"),
        (status = 404, description = "Target student not found")
    )
)]
pub async fn send_notification(
    State(state): State<NotificationsApiState>,
    auth: RoleGuard<TeacherOrAdmin>,
    ValidatedJson(body): ValidatedJson<SendNotificationRequest>,
) -> Result<Json<SendNotificationResponse>, ApiError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::unprocessable(
            "FIELD_EMPTY",
            "Message must be a non-empty string",
        ));
    }

    let recipients = match body.student_id {
        Some(student_id) => {
            // Target must resolve to an actual student profile
            student::get_by_user_id(state.database.pool(), student_id)
                .await
                .map_err(ApiError::from_data)?
                .ok_or_else(|| {
                    ApiError::not_found("STUDENT_NOT_FOUND", "Student not found")
                })?;

            notification::send_to_user(
                state.database.pool(),
                auth.ctx.user_id,
                student_id,
                message,
            )
            .await
            .map_err(ApiError::from_data)?;
            1
        }
        None => notification::broadcast_to_students(
            state.database.pool(),
            auth.ctx.user_id,
            message,
        )
        .await
        .map_err(ApiError::from_data)?,
    };

    Ok(Json(SendNotificationResponse { recipients }))
}
