//! Student profile repository
//!
//! Every student profile is linked 1:1 to a user row via `user_id`; the
//! linked user is always resolved through that foreign key, never by email.
//! Create and delete touch both rows as one transaction so a failure on
//! either side leaves nothing behind.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data::error::DataError;
use crate::data::repositories::user::{email_in_use, insert_user};
use crate::data::types::{Role, StudentRow};

/// Input for creating a student (user + profile)
#[derive(Debug)]
pub struct NewStudent<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub grade: Option<&'a str>,
    pub section: &'a str,
    pub password_hash: &'a str,
}

/// Fields that can change on a student update; `None` leaves the column as-is
#[derive(Debug, Default)]
pub struct StudentPatch<'a> {
    pub full_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub grade: Option<&'a str>,
    pub section: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

/// Create a user (role student) and its profile row in one transaction
pub async fn create_student(
    pool: &SqlitePool,
    new: NewStudent<'_>,
) -> Result<StudentRow, DataError> {
    let mut tx = pool.begin().await?;

    if email_in_use(&mut tx, new.email, None).await? {
        return Err(DataError::conflict("Email already in use"));
    }

    let user_id = insert_user(
        &mut tx,
        new.email,
        new.full_name,
        Role::Student,
        new.password_hash,
    )
    .await?;

    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO students (user_id, full_name, email, grade, section, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(new.full_name)
    .bind(new.email)
    .bind(new.grade)
    .bind(new.section)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    let student_id = result.last_insert_rowid();

    tx.commit().await?;

    get_student(pool, student_id)
        .await?
        .ok_or_else(|| DataError::conflict("Student vanished after insert"))
}

/// Get a student profile by its id
pub async fn get_student(
    pool: &SqlitePool,
    student_id: i64,
) -> Result<Option<StudentRow>, DataError> {
    fetch_where(pool, "student_id", student_id).await
}

/// Get a student profile by its owning user id
pub async fn get_by_user_id(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<StudentRow>, DataError> {
    fetch_where(pool, "user_id", user_id).await
}

async fn fetch_where(
    pool: &SqlitePool,
    column: &str,
    value: i64,
) -> Result<Option<StudentRow>, DataError> {
    let sql = format!(
        "SELECT student_id, user_id, full_name, email, grade, section, created_at, updated_at \
         FROM students WHERE {} = ?",
        column
    );
    let row = sqlx::query_as::<_, (i64, i64, String, String, Option<String>, String, i64, i64)>(
        &sql,
    )
    .bind(value)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_row))
}

fn to_row(
    (student_id, user_id, full_name, email, grade, section, created_at, updated_at): (
        i64,
        i64,
        String,
        String,
        Option<String>,
        String,
        i64,
        i64,
    ),
) -> StudentRow {
    StudentRow {
        student_id,
        user_id,
        full_name,
        email,
        grade,
        section,
        created_at,
        updated_at,
    }
}

/// List student profiles ordered by id
pub async fn list_students(
    pool: &SqlitePool,
    skip: u32,
    limit: u32,
) -> Result<Vec<StudentRow>, DataError> {
    let rows = sqlx::query_as::<_, (i64, i64, String, String, Option<String>, String, i64, i64)>(
        "SELECT student_id, user_id, full_name, email, grade, section, created_at, updated_at \
         FROM students ORDER BY student_id ASC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(to_row).collect())
}

/// Apply a partial update to a student and its owning user in one transaction
///
/// Mirrored fields (name, email) are written to both rows; grade/section stay
/// profile-only; the password hash belongs to the user row. Returns
/// `Ok(None)` if the profile does not exist.
pub async fn update_student(
    pool: &SqlitePool,
    student_id: i64,
    patch: StudentPatch<'_>,
) -> Result<Option<StudentRow>, DataError> {
    let mut tx = pool.begin().await?;

    let Some(current) = fetch_tx(&mut tx, student_id).await? else {
        return Ok(None);
    };

    // The owning user is resolved strictly via user_id, never by email
    let user_id = current.user_id;

    if let Some(new_email) = patch.email {
        if new_email != current.email && email_in_use(&mut tx, new_email, Some(user_id)).await? {
            return Err(DataError::conflict("Email already in use"));
        }
    }

    let full_name = patch.full_name.unwrap_or(&current.full_name);
    let email = patch.email.unwrap_or(&current.email);
    let grade = match patch.grade {
        Some(g) => Some(g.to_string()),
        None => current.grade.clone(),
    };
    let section = patch.section.unwrap_or(&current.section);
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "UPDATE students SET full_name = ?, email = ?, grade = ?, section = ?, updated_at = ? \
         WHERE student_id = ?",
    )
    .bind(full_name)
    .bind(email)
    .bind(&grade)
    .bind(section)
    .bind(now)
    .bind(student_id)
    .execute(&mut *tx)
    .await?;

    match patch.password_hash {
        Some(hash) => {
            sqlx::query(
                "UPDATE users SET email = ?, full_name = ?, password_hash = ?, updated_at = ? \
                 WHERE user_id = ?",
            )
            .bind(email)
            .bind(full_name)
            .bind(hash)
            .bind(now)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DataError::from_unique_violation(e, "Email already in use"))?;
        }
        None => {
            sqlx::query(
                "UPDATE users SET email = ?, full_name = ?, updated_at = ? WHERE user_id = ?",
            )
            .bind(email)
            .bind(full_name)
            .bind(now)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DataError::from_unique_violation(e, "Email already in use"))?;
        }
    }

    tx.commit().await?;
    get_student(pool, student_id).await
}

/// Delete a student profile and its owning user as one atomic unit
pub async fn delete_student(pool: &SqlitePool, student_id: i64) -> Result<bool, DataError> {
    let mut tx = pool.begin().await?;

    let Some(current) = fetch_tx(&mut tx, student_id).await? else {
        return Ok(false);
    };

    sqlx::query("DELETE FROM students WHERE student_id = ?")
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM users WHERE user_id = ?")
        .bind(current.user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

async fn fetch_tx(
    tx: &mut Transaction<'_, Sqlite>,
    student_id: i64,
) -> Result<Option<StudentRow>, DataError> {
    let row = sqlx::query_as::<_, (i64, i64, String, String, Option<String>, String, i64, i64)>(
        "SELECT student_id, user_id, full_name, email, grade, section, created_at, updated_at \
         FROM students WHERE student_id = ?",
    )
    .bind(student_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(to_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repositories::user;
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

    fn alice() -> NewStudent<'static> {
        NewStudent {
            full_name: "Alice Student",
            email: "alice@student.edu",
            grade: Some("8"),
            section: "A",
            password_hash: "hash",
        }
    }

    #[tokio::test]
    async fn test_create_student_creates_both_rows() {
        let pool = setup_test_pool().await;
        let student = create_student(&pool, alice()).await.unwrap();

        assert_eq!(student.section, "A");
        assert_eq!(student.grade.as_deref(), Some("8"));

        let linked = user::get_user(&pool, student.user_id).await.unwrap().unwrap();
        assert_eq!(linked.role, Role::Student);
        assert_eq!(linked.email, student.email);
        assert_eq!(linked.full_name, student.full_name);
    }

    #[tokio::test]
    async fn test_create_student_duplicate_email_leaves_no_orphan() {
        let pool = setup_test_pool().await;
        user::create_user(&pool, "alice@student.edu", "Existing", Role::Teacher, "h")
            .await
            .unwrap();

        let err = create_student(&pool, alice()).await.unwrap_err();
        assert!(matches!(err, DataError::Conflict(_)));

        // Exactly the pre-existing user survives; no student row appeared
        let users = user::list_users(&pool, None, 0, 100).await.unwrap();
        assert_eq!(users.len(), 1);
        let students = list_students(&pool, 0, 100).await.unwrap();
        assert!(students.is_empty());
    }

    #[tokio::test]
    async fn test_failed_profile_insert_rolls_back_user() {
        let pool = setup_test_pool().await;
        // Blank section violates the profile CHECK constraint after the user
        // insert has already succeeded inside the transaction.
        let bad = NewStudent {
            section: "",
            ..alice()
        };
        assert!(create_student(&pool, bad).await.is_err());

        let users = user::list_users(&pool, None, 0, 100).await.unwrap();
        assert!(users.is_empty(), "user insert must be rolled back");
    }

    #[tokio::test]
    async fn test_get_by_user_id() {
        let pool = setup_test_pool().await;
        let student = create_student(&pool, alice()).await.unwrap();

        let found = get_by_user_id(&pool, student.user_id).await.unwrap().unwrap();
        assert_eq!(found.student_id, student.student_id);
        assert!(get_by_user_id(&pool, 9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_mirrors_into_user_row() {
        let pool = setup_test_pool().await;
        let student = create_student(&pool, alice()).await.unwrap();

        let patch = StudentPatch {
            full_name: Some("Alice Updated"),
            email: Some("alice.new@student.edu"),
            grade: Some("9"),
            ..Default::default()
        };
        let updated = update_student(&pool, student.student_id, patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "Alice Updated");
        assert_eq!(updated.email, "alice.new@student.edu");
        assert_eq!(updated.grade.as_deref(), Some("9"));

        let linked = user::get_user(&pool, student.user_id).await.unwrap().unwrap();
        assert_eq!(linked.full_name, "Alice Updated");
        assert_eq!(linked.email, "alice.new@student.edu");
    }

    #[tokio::test]
    async fn test_update_email_conflict_rolls_back() {
        let pool = setup_test_pool().await;
        let student = create_student(&pool, alice()).await.unwrap();
        user::create_user(&pool, "taken@school.edu", "Other", Role::Teacher, "h")
            .await
            .unwrap();

        let patch = StudentPatch {
            email: Some("taken@school.edu"),
            ..Default::default()
        };
        let err = update_student(&pool, student.student_id, patch)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Conflict(_)));

        // Both rows keep the old email
        let unchanged = get_student(&pool, student.student_id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, "alice@student.edu");
        let linked = user::get_user(&pool, student.user_id).await.unwrap().unwrap();
        assert_eq!(linked.email, "alice@student.edu");
    }

    #[tokio::test]
    async fn test_user_update_mirrors_into_profile() {
        let pool = setup_test_pool().await;
        let student = create_student(&pool, alice()).await.unwrap();

        let patch = user::UserPatch {
            email: Some("renamed@student.edu"),
            full_name: Some("Renamed"),
            ..Default::default()
        };
        user::update_user(&pool, student.user_id, patch).await.unwrap();

        let profile = get_student(&pool, student.student_id).await.unwrap().unwrap();
        assert_eq!(profile.email, "renamed@student.edu");
        assert_eq!(profile.full_name, "Renamed");
    }

    #[tokio::test]
    async fn test_role_change_blocked_by_profile() {
        let pool = setup_test_pool().await;
        let student = create_student(&pool, alice()).await.unwrap();

        let patch = user::UserPatch {
            role: Some(Role::Teacher),
            ..Default::default()
        };
        let err = user::update_user(&pool, student.user_id, patch)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_both_rows() {
        let pool = setup_test_pool().await;
        let student = create_student(&pool, alice()).await.unwrap();

        assert!(delete_student(&pool, student.student_id).await.unwrap());
        assert!(get_student(&pool, student.student_id).await.unwrap().is_none());
        assert!(user::get_user(&pool, student.user_id).await.unwrap().is_none());

        assert!(!delete_student(&pool, student.student_id).await.unwrap());
    }
}
