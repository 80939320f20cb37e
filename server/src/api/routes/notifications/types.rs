//! Notification API request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::NotificationRow;

/// Public view of a notification
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationDto {
    pub id: i64,
    pub sent_by: i64,
    pub message: String,
    pub sent_at: i64,
    pub is_read: bool,
}

impl From<NotificationRow> for NotificationDto {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.notification_id,
            sent_by: row.sent_by,
            message: row.message,
            sent_at: row.sent_at,
            is_read: row.is_read,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkReadRequest {
    /// Notification ids to mark; absent marks all unread
    pub ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkReadResponse {
    pub marked: u64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
    /// Target one student by user id; absent fans out to every student
    pub student_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendNotificationResponse {
    pub recipients: u64,
}
