//! Timetable repository
//!
//! Entry creation runs its reference checks and the per-student overlap
//! scan inside the same transaction as the insert; SQLite's single-writer
//! locking is what keeps two concurrent creates for one student from both
//! passing the scan.

use chrono::NaiveTime;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data::error::DataError;
use crate::data::types::{TimetableEntryRow, TimetableItemRow, Weekday};
use crate::domain::schedule;

/// Input for creating a timetable entry; student/teacher are user ids
#[derive(Debug)]
pub struct NewEntry {
    pub student_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub day_of_week: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Outcome of a create attempt whose domain checks can fail
///
/// Reference and overlap failures are ordinary outcomes here, not storage
/// errors; the handler maps them onto 404/409.
#[derive(Debug)]
pub enum CreateEntryResult {
    Created(TimetableEntryRow),
    MissingStudent,
    MissingTeacher,
    MissingClass,
    Overlap,
}

/// Create a timetable entry after checking references and overlap.
///
/// Callers validate `start < end` beforehand. Check order inside the
/// transaction: student exists, teacher exists, class exists, then the
/// overlap scan for the same student and weekday.
pub async fn create_entry(
    pool: &SqlitePool,
    new: NewEntry,
) -> Result<CreateEntryResult, DataError> {
    let mut tx = pool.begin().await?;

    if !profile_exists(&mut tx, "students", new.student_id).await? {
        return Ok(CreateEntryResult::MissingStudent);
    }
    if !profile_exists(&mut tx, "teachers", new.teacher_id).await? {
        return Ok(CreateEntryResult::MissingTeacher);
    }

    let class_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes WHERE class_id = ?")
        .bind(new.class_id)
        .fetch_one(&mut *tx)
        .await?;
    if class_count == 0 {
        return Ok(CreateEntryResult::MissingClass);
    }

    let existing = sqlx::query_as::<_, (String, String)>(
        "SELECT start_time, end_time FROM timetable_entries \
         WHERE student_id = ? AND day_of_week = ?",
    )
    .bind(new.student_id)
    .bind(new.day_of_week)
    .fetch_all(&mut *tx)
    .await?;

    for (start_s, end_s) in &existing {
        let (Some(start), Some(end)) =
            (schedule::parse_hhmm(start_s), schedule::parse_hhmm(end_s))
        else {
            continue;
        };
        if schedule::overlaps(new.start, new.end, start, end) {
            return Ok(CreateEntryResult::Overlap);
        }
    }

    let start_time = schedule::format_hhmm(new.start);
    let end_time = schedule::format_hhmm(new.end);
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO timetable_entries \
         (student_id, teacher_id, class_id, day_of_week, start_time, end_time, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(new.student_id)
    .bind(new.teacher_id)
    .bind(new.class_id)
    .bind(new.day_of_week)
    .bind(&start_time)
    .bind(&end_time)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(CreateEntryResult::Created(TimetableEntryRow {
        entry_id: result.last_insert_rowid(),
        student_id: new.student_id,
        teacher_id: new.teacher_id,
        class_id: new.class_id,
        day_of_week: new.day_of_week,
        start_time,
        end_time,
        created_at: now,
    }))
}

/// Whether a profile row exists for this user id in the given table
async fn profile_exists(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    user_id: i64,
) -> Result<bool, DataError> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = ?", table);
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(count > 0)
}

/// Joined week items for a student, Monday first then by start time
pub async fn list_for_student(
    pool: &SqlitePool,
    student_user_id: i64,
) -> Result<Vec<TimetableItemRow>, DataError> {
    let rows = sqlx::query_as::<_, (Weekday, String, String, String, Option<String>)>(
        "SELECT tt.day_of_week, tt.start_time, tt.end_time, c.class_name, u.full_name \
         FROM timetable_entries tt \
         JOIN classes c ON tt.class_id = c.class_id \
         LEFT JOIN users u ON tt.teacher_id = u.user_id \
         WHERE tt.student_id = ? \
         ORDER BY CASE tt.day_of_week \
             WHEN 'Monday' THEN 0 WHEN 'Tuesday' THEN 1 WHEN 'Wednesday' THEN 2 \
             WHEN 'Thursday' THEN 3 WHEN 'Friday' THEN 4 WHEN 'Saturday' THEN 5 \
             ELSE 6 END, tt.start_time",
    )
    .bind(student_user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(day, start, end, subject, teacher)| TimetableItemRow {
            day,
            start,
            end,
            subject,
            teacher,
        })
        .collect())
}

/// Joined week items for the classes a teacher teaches
pub async fn list_for_teacher(
    pool: &SqlitePool,
    teacher_user_id: i64,
) -> Result<Vec<TimetableItemRow>, DataError> {
    let rows = sqlx::query_as::<_, (Weekday, String, String, String)>(
        "SELECT tt.day_of_week, tt.start_time, tt.end_time, c.class_name \
         FROM timetable_entries tt \
         JOIN classes c ON tt.class_id = c.class_id \
         WHERE tt.teacher_id = ? \
         ORDER BY CASE tt.day_of_week \
             WHEN 'Monday' THEN 0 WHEN 'Tuesday' THEN 1 WHEN 'Wednesday' THEN 2 \
             WHEN 'Thursday' THEN 3 WHEN 'Friday' THEN 4 WHEN 'Saturday' THEN 5 \
             ELSE 6 END, tt.start_time",
    )
    .bind(teacher_user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(day, start, end, subject)| TimetableItemRow {
            day,
            start,
            end,
            subject,
            teacher: None,
        })
        .collect())
}

/// Distinct students across all entries a teacher teaches
pub async fn count_distinct_students(
    pool: &SqlitePool,
    teacher_user_id: i64,
) -> Result<i64, DataError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT student_id) FROM timetable_entries WHERE teacher_id = ?",
    )
    .bind(teacher_user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repositories::{class, student, teacher};
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

    struct Fixture {
        student_user_id: i64,
        teacher_user_id: i64,
        class_id: i64,
    }

    async fn setup_fixture(pool: &SqlitePool) -> Fixture {
        let s = student::create_student(
            pool,
            student::NewStudent {
                full_name: "Alice Student",
                email: "alice@student.edu",
                grade: Some("8"),
                section: "A",
                password_hash: "h",
            },
        )
        .await
        .unwrap();
        let t = teacher::create_teacher(
            pool,
            teacher::NewTeacher {
                full_name: "Tom Teacher",
                email: "tom@school.edu",
                subject: Some("Mathematics"),
                department: None,
                employee_code: None,
                phone: None,
                password_hash: "h",
            },
        )
        .await
        .unwrap();
        let c = class::create_class(pool, "Mathematics").await.unwrap();
        Fixture {
            student_user_id: s.user_id,
            teacher_user_id: t.user_id,
            class_id: c.class_id,
        }
    }

    fn t(s: &str) -> NaiveTime {
        schedule::parse_hhmm(s).unwrap()
    }

    fn entry(f: &Fixture, day: Weekday, start: &str, end: &str) -> NewEntry {
        NewEntry {
            student_id: f.student_user_id,
            teacher_id: f.teacher_user_id,
            class_id: f.class_id,
            day_of_week: day,
            start: t(start),
            end: t(end),
        }
    }

    #[tokio::test]
    async fn test_create_entry_success() {
        let pool = setup_test_pool().await;
        let f = setup_fixture(&pool).await;

        let result = create_entry(&pool, entry(&f, Weekday::Monday, "09:00", "10:00"))
            .await
            .unwrap();
        let row = match result {
            CreateEntryResult::Created(row) => row,
            other => panic!("expected Created, got {:?}", other),
        };
        assert!(row.entry_id > 0);
        assert_eq!(row.start_time, "09:00");
        assert_eq!(row.day_of_week, Weekday::Monday);
    }

    #[tokio::test]
    async fn test_overlapping_entry_rejected() {
        let pool = setup_test_pool().await;
        let f = setup_fixture(&pool).await;

        create_entry(&pool, entry(&f, Weekday::Monday, "09:00", "10:00"))
            .await
            .unwrap();

        // 09:30-10:30 intersects 09:00-10:00
        let result = create_entry(&pool, entry(&f, Weekday::Monday, "09:30", "10:30"))
            .await
            .unwrap();
        assert!(matches!(result, CreateEntryResult::Overlap));
    }

    #[tokio::test]
    async fn test_touching_endpoints_allowed() {
        let pool = setup_test_pool().await;
        let f = setup_fixture(&pool).await;

        create_entry(&pool, entry(&f, Weekday::Monday, "09:00", "10:00"))
            .await
            .unwrap();

        let result = create_entry(&pool, entry(&f, Weekday::Monday, "10:00", "11:00"))
            .await
            .unwrap();
        assert!(matches!(result, CreateEntryResult::Created(_)));
    }

    #[tokio::test]
    async fn test_same_slot_different_day_allowed() {
        let pool = setup_test_pool().await;
        let f = setup_fixture(&pool).await;

        create_entry(&pool, entry(&f, Weekday::Monday, "09:00", "10:00"))
            .await
            .unwrap();

        let result = create_entry(&pool, entry(&f, Weekday::Tuesday, "09:30", "10:30"))
            .await
            .unwrap();
        assert!(matches!(result, CreateEntryResult::Created(_)));
    }

    #[tokio::test]
    async fn test_missing_references() {
        let pool = setup_test_pool().await;
        let f = setup_fixture(&pool).await;

        let missing_student = NewEntry {
            student_id: 9999,
            ..entry(&f, Weekday::Monday, "09:00", "10:00")
        };
        assert!(matches!(
            create_entry(&pool, missing_student).await.unwrap(),
            CreateEntryResult::MissingStudent
        ));

        let missing_teacher = NewEntry {
            teacher_id: 9999,
            ..entry(&f, Weekday::Monday, "09:00", "10:00")
        };
        assert!(matches!(
            create_entry(&pool, missing_teacher).await.unwrap(),
            CreateEntryResult::MissingTeacher
        ));

        let missing_class = NewEntry {
            class_id: 9999,
            ..entry(&f, Weekday::Monday, "09:00", "10:00")
        };
        assert!(matches!(
            create_entry(&pool, missing_class).await.unwrap(),
            CreateEntryResult::MissingClass
        ));
    }

    #[tokio::test]
    async fn test_list_for_student_ordering() {
        let pool = setup_test_pool().await;
        let f = setup_fixture(&pool).await;

        create_entry(&pool, entry(&f, Weekday::Friday, "08:00", "09:00"))
            .await
            .unwrap();
        create_entry(&pool, entry(&f, Weekday::Monday, "11:00", "12:00"))
            .await
            .unwrap();
        create_entry(&pool, entry(&f, Weekday::Monday, "09:00", "10:00"))
            .await
            .unwrap();

        let items = list_for_student(&pool, f.student_user_id).await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].day, Weekday::Monday);
        assert_eq!(items[0].start, "09:00");
        assert_eq!(items[1].day, Weekday::Monday);
        assert_eq!(items[1].start, "11:00");
        assert_eq!(items[2].day, Weekday::Friday);
        assert_eq!(items[0].subject, "Mathematics");
        assert_eq!(items[0].teacher.as_deref(), Some("Tom Teacher"));
    }

    #[tokio::test]
    async fn test_teacher_views_and_student_count() {
        let pool = setup_test_pool().await;
        let f = setup_fixture(&pool).await;

        create_entry(&pool, entry(&f, Weekday::Monday, "09:00", "10:00"))
            .await
            .unwrap();

        let second = student::create_student(
            &pool,
            student::NewStudent {
                full_name: "Bob Student",
                email: "bob@student.edu",
                grade: Some("8"),
                section: "B",
                password_hash: "h",
            },
        )
        .await
        .unwrap();
        let mut for_bob = entry(&f, Weekday::Monday, "09:00", "10:00");
        for_bob.student_id = second.user_id;
        create_entry(&pool, for_bob).await.unwrap();

        let items = list_for_teacher(&pool, f.teacher_user_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.teacher.is_none()));

        let count = count_distinct_students(&pool, f.teacher_user_id)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
