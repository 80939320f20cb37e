//! OpenAPI specification

use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{
    auth, chatbot, health, materials, notifications, students, teachers, timetable, users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LearnLoop API",
        version = env!("CARGO_PKG_VERSION"),
        description = "School management API"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User administration"),
        (name = "students", description = "Student profile administration"),
        (name = "teachers", description = "Teacher profile administration"),
        (name = "timetable", description = "Per-student schedules"),
        (name = "materials", description = "Teaching material uploads"),
        (name = "notifications", description = "Notifications"),
        (name = "chatbot", description = "Canned keyword chatbot")
    ),
    paths(
        // Health
        health::health,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Students
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        // Teachers
        teachers::list_teachers,
        teachers::get_teacher,
        teachers::create_teacher,
        teachers::update_teacher,
        teachers::delete_teacher,
        // Timetable
        timetable::create_entry,
        timetable::get_week,
        // Materials
        materials::upload_material,
        materials::my_materials,
        materials::materials_for_me,
        materials::delete_material,
        // Notifications
        notifications::list_notifications,
        notifications::list_unread,
        notifications::mark_read,
        notifications::send_notification,
        // Chatbot
        chatbot::chat_student,
        chatbot::chat_teacher,
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
