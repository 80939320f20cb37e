//! Notification repository
//!
//! Rows are created by teacher/admin sends and mutated only by the
//! recipient marking them read. The whole-school broadcast inserts every
//! row in one transaction: all students get the notification or none do.

use sqlx::SqlitePool;

use crate::data::error::DataError;
use crate::data::types::NotificationRow;

type NotificationTuple = (i64, i64, i64, String, i64, i64);

fn to_row(
    (notification_id, sent_by, sent_to, message, sent_at, is_read): NotificationTuple,
) -> NotificationRow {
    NotificationRow {
        notification_id,
        sent_by,
        sent_to,
        message,
        sent_at,
        is_read: is_read != 0,
    }
}

/// Insert a single notification
pub async fn send_to_user(
    pool: &SqlitePool,
    sent_by: i64,
    sent_to: i64,
    message: &str,
) -> Result<NotificationRow, DataError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO notifications (sent_by, sent_to, message, sent_at, is_read) \
         VALUES (?, ?, ?, ?, 0)",
    )
    .bind(sent_by)
    .bind(sent_to)
    .bind(message)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(NotificationRow {
        notification_id: result.last_insert_rowid(),
        sent_by,
        sent_to,
        message: message.to_string(),
        sent_at: now,
        is_read: false,
    })
}

/// Fan a notification out to every student, atomically.
/// Returns the number of recipients.
pub async fn broadcast_to_students(
    pool: &SqlitePool,
    sent_by: i64,
    message: &str,
) -> Result<u64, DataError> {
    let mut tx = pool.begin().await?;

    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO notifications (sent_by, sent_to, message, sent_at, is_read) \
         SELECT ?, user_id, ?, ?, 0 FROM users WHERE role = 'student'",
    )
    .bind(sent_by)
    .bind(message)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}

/// List a user's notifications, newest first; optionally unread only
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    unread_only: bool,
) -> Result<Vec<NotificationRow>, DataError> {
    let sql = if unread_only {
        "SELECT notification_id, sent_by, sent_to, message, sent_at, is_read \
         FROM notifications WHERE sent_to = ? AND is_read = 0 \
         ORDER BY sent_at DESC, notification_id DESC"
    } else {
        "SELECT notification_id, sent_by, sent_to, message, sent_at, is_read \
         FROM notifications WHERE sent_to = ? \
         ORDER BY sent_at DESC, notification_id DESC"
    };

    let rows = sqlx::query_as::<_, NotificationTuple>(sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(to_row).collect())
}

/// Count a user's unread notifications
pub async fn count_unread(pool: &SqlitePool, user_id: i64) -> Result<i64, DataError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE sent_to = ? AND is_read = 0",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Mark notifications read for a user.
///
/// With `ids`, only those of the user's rows are touched; rows belonging to
/// other users are never affected. Without, all of the user's unread rows
/// are marked. Returns the number of rows changed.
pub async fn mark_read(
    pool: &SqlitePool,
    user_id: i64,
    ids: Option<&[i64]>,
) -> Result<u64, DataError> {
    let affected = match ids {
        Some(ids) => {
            if ids.is_empty() {
                return Ok(0);
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!(
                "UPDATE notifications SET is_read = 1 \
                 WHERE sent_to = ? AND is_read = 0 AND notification_id IN ({})",
                placeholders
            );
            let mut query = sqlx::query(&sql).bind(user_id);
            for id in ids {
                query = query.bind(id);
            }
            query.execute(pool).await?.rows_affected()
        }
        None => {
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE sent_to = ? AND is_read = 0")
                .bind(user_id)
                .execute(pool)
                .await?
                .rows_affected()
        }
    };

    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repositories::user;
    use crate::data::types::Role;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        sqlx::query(crate::data::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn make_user(pool: &SqlitePool, email: &str, role: Role) -> i64 {
        user::create_user(pool, email, "Name", role, "h")
            .await
            .unwrap()
            .user_id
    }

    #[tokio::test]
    async fn test_send_and_list() {
        let pool = setup_test_pool().await;
        let teacher = make_user(&pool, "t@s.edu", Role::Teacher).await;
        let student = make_user(&pool, "s@s.edu", Role::Student).await;

        send_to_user(&pool, teacher, student, "Homework due Friday")
            .await
            .unwrap();

        let all = list_for_user(&pool, student, false).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].message, "Homework due Friday");
        assert!(!all[0].is_read);

        // Sender sees nothing addressed to them
        assert!(list_for_user(&pool, teacher, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_students_only() {
        let pool = setup_test_pool().await;
        let teacher = make_user(&pool, "t@s.edu", Role::Teacher).await;
        let s1 = make_user(&pool, "s1@s.edu", Role::Student).await;
        let s2 = make_user(&pool, "s2@s.edu", Role::Student).await;
        let admin = make_user(&pool, "a@s.edu", Role::Admin).await;

        let count = broadcast_to_students(&pool, teacher, "Assembly at noon")
            .await
            .unwrap();
        assert_eq!(count, 2);

        assert_eq!(count_unread(&pool, s1).await.unwrap(), 1);
        assert_eq!(count_unread(&pool, s2).await.unwrap(), 1);
        assert_eq!(count_unread(&pool, admin).await.unwrap(), 0);
        assert_eq!(count_unread(&pool, teacher).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_selected_ids() {
        let pool = setup_test_pool().await;
        let teacher = make_user(&pool, "t@s.edu", Role::Teacher).await;
        let student = make_user(&pool, "s@s.edu", Role::Student).await;

        let n1 = send_to_user(&pool, teacher, student, "one").await.unwrap();
        send_to_user(&pool, teacher, student, "two").await.unwrap();

        let changed = mark_read(&pool, student, Some(&[n1.notification_id]))
            .await
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(count_unread(&pool, student).await.unwrap(), 1);

        let unread = list_for_user(&pool, student, true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message, "two");
    }

    #[tokio::test]
    async fn test_mark_read_all() {
        let pool = setup_test_pool().await;
        let teacher = make_user(&pool, "t@s.edu", Role::Teacher).await;
        let student = make_user(&pool, "s@s.edu", Role::Student).await;

        send_to_user(&pool, teacher, student, "one").await.unwrap();
        send_to_user(&pool, teacher, student, "two").await.unwrap();

        let changed = mark_read(&pool, student, None).await.unwrap();
        assert_eq!(changed, 2);
        assert_eq!(count_unread(&pool, student).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_cannot_touch_other_users_rows() {
        let pool = setup_test_pool().await;
        let teacher = make_user(&pool, "t@s.edu", Role::Teacher).await;
        let s1 = make_user(&pool, "s1@s.edu", Role::Student).await;
        let s2 = make_user(&pool, "s2@s.edu", Role::Student).await;

        let other = send_to_user(&pool, teacher, s2, "for s2").await.unwrap();

        let changed = mark_read(&pool, s1, Some(&[other.notification_id]))
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(count_unread(&pool, s2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_read_empty_ids() {
        let pool = setup_test_pool().await;
        let student = make_user(&pool, "s@s.edu", Role::Student).await;
        assert_eq!(mark_read(&pool, student, Some(&[])).await.unwrap(), 0);
    }
}
