//! Chatbot API endpoints (`/api/chat`)
//!
//! Canned keyword queries over the caller's own timetable and
//! notifications. Intent matching and reply wording live in
//! `domain::chat`; this module only runs the data lookups.

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::auth::{RoleGuard, StudentOrAdmin, TeacherOrAdmin};
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::data::repositories::{notification, timetable};
use crate::data::Database;
use crate::domain::chat;

use types::{ChatReply, ChatRequest};

/// Shared state for Chatbot API endpoints
#[derive(Clone)]
pub struct ChatApiState {
    pub database: Arc<Database>,
}

/// Build Chatbot API routes
pub fn routes(database: Arc<Database>) -> Router {
    let state = ChatApiState { database };

    Router::new()
        .route("/student", post(chat_student))
        .route("/teacher", post(chat_teacher))
        .with_state(state)
}

/// Student chatbot: timetable and notification queries
#[utoipa::path(
    post,
    path = "/api/chat/student",
    tag = "chatbot",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Canned reply", body = ChatReply),
        (status = 403, description = "Student or admin only")
    )
)]
pub async fn chat_student(
    State(state): State<ChatApiState>,
    auth: RoleGuard<StudentOrAdmin>,
    ValidatedJson(body): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let pool = state.database.pool();
    let user_id = auth.ctx.user_id;

    let reply = match chat::student_intent(&body.message) {
        chat::StudentIntent::NextClass => {
            let items = timetable::list_for_student(pool, user_id)
                .await
                .map_err(ApiError::from_data)?;
            chat::reply_next_class(items.first())
        }
        chat::StudentIntent::UnreadCount => {
            let count = notification::count_unread(pool, user_id)
                .await
                .map_err(ApiError::from_data)?;
            chat::reply_unread_count(count)
        }
        chat::StudentIntent::TodaySchedule => {
            let items = timetable::list_for_student(pool, user_id)
                .await
                .map_err(ApiError::from_data)?;
            chat::reply_student_schedule(&items)
        }
        chat::StudentIntent::Help => chat::student_help(),
    };

    Ok(Json(ChatReply { reply }))
}

/// Teacher chatbot: schedule, notification and student-count queries
#[utoipa::path(
    post,
    path = "/api/chat/teacher",
    tag = "chatbot",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Canned reply", body = ChatReply),
        (status = 403, description = "Teacher or admin only")
    )
)]
pub async fn chat_teacher(
    State(state): State<ChatApiState>,
    auth: RoleGuard<TeacherOrAdmin>,
    ValidatedJson(body): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let pool = state.database.pool();
    let user_id = auth.ctx.user_id;

    let reply = match chat::teacher_intent(&body.message) {
        chat::TeacherIntent::MySchedule => {
            let items = timetable::list_for_teacher(pool, user_id)
                .await
                .map_err(ApiError::from_data)?;
            chat::reply_teacher_schedule(&items)
        }
        chat::TeacherIntent::UnreadCount => {
            let count = notification::count_unread(pool, user_id)
                .await
                .map_err(ApiError::from_data)?;
            chat::reply_unread_count(count)
        }
        chat::TeacherIntent::StudentCount => {
            let count = timetable::count_distinct_students(pool, user_id)
                .await
                .map_err(ApiError::from_data)?;
            chat::reply_student_count(count)
        }
        chat::TeacherIntent::Help => chat::teacher_help(),
    };

    Ok(Json(ChatReply { reply }))
}
