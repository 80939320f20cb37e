//! Teacher profile repository
//!
//! Same 1:1 user linkage and transactional rules as the student repository.
//! Phone numbers are validated and normalized before they reach this module;
//! the stored form is always `+61` followed by nine digits.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data::error::DataError;
use crate::data::repositories::user::{email_in_use, insert_user};
use crate::data::types::{Role, TeacherRow};

/// Input for creating a teacher (user + profile)
#[derive(Debug)]
pub struct NewTeacher<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub subject: Option<&'a str>,
    pub department: Option<&'a str>,
    pub employee_code: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Fields that can change on a teacher update; `None` leaves the column as-is
#[derive(Debug, Default)]
pub struct TeacherPatch<'a> {
    pub full_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub subject: Option<&'a str>,
    pub department: Option<&'a str>,
    pub employee_code: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

type TeacherTuple = (
    i64,
    i64,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    i64,
    i64,
);

const TEACHER_COLUMNS: &str = "teacher_id, user_id, full_name, email, subject, department, \
                               employee_code, phone, created_at, updated_at";

fn to_row(
    (teacher_id, user_id, full_name, email, subject, department, employee_code, phone, created_at, updated_at): TeacherTuple,
) -> TeacherRow {
    TeacherRow {
        teacher_id,
        user_id,
        full_name,
        email,
        subject,
        department,
        employee_code,
        phone,
        created_at,
        updated_at,
    }
}

/// Create a user (role teacher) and its profile row in one transaction
pub async fn create_teacher(
    pool: &SqlitePool,
    new: NewTeacher<'_>,
) -> Result<TeacherRow, DataError> {
    let mut tx = pool.begin().await?;

    if email_in_use(&mut tx, new.email, None).await? {
        return Err(DataError::conflict("Email already in use"));
    }

    let user_id = insert_user(
        &mut tx,
        new.email,
        new.full_name,
        Role::Teacher,
        new.password_hash,
    )
    .await?;

    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO teachers (user_id, full_name, email, subject, department, employee_code, \
         phone, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(new.full_name)
    .bind(new.email)
    .bind(new.subject)
    .bind(new.department)
    .bind(new.employee_code)
    .bind(new.phone)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    let teacher_id = result.last_insert_rowid();

    tx.commit().await?;

    get_teacher(pool, teacher_id)
        .await?
        .ok_or_else(|| DataError::conflict("Teacher vanished after insert"))
}

/// Get a teacher profile by its id
pub async fn get_teacher(
    pool: &SqlitePool,
    teacher_id: i64,
) -> Result<Option<TeacherRow>, DataError> {
    let sql = format!(
        "SELECT {} FROM teachers WHERE teacher_id = ?",
        TEACHER_COLUMNS
    );
    let row = sqlx::query_as::<_, TeacherTuple>(&sql)
        .bind(teacher_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(to_row))
}

/// Get a teacher profile by its owning user id
pub async fn get_by_user_id(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<TeacherRow>, DataError> {
    let sql = format!("SELECT {} FROM teachers WHERE user_id = ?", TEACHER_COLUMNS);
    let row = sqlx::query_as::<_, TeacherTuple>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(to_row))
}

/// List teacher profiles ordered by id
pub async fn list_teachers(
    pool: &SqlitePool,
    skip: u32,
    limit: u32,
) -> Result<Vec<TeacherRow>, DataError> {
    let sql = format!(
        "SELECT {} FROM teachers ORDER BY teacher_id ASC LIMIT ? OFFSET ?",
        TEACHER_COLUMNS
    );
    let rows = sqlx::query_as::<_, TeacherTuple>(&sql)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(to_row).collect())
}

/// Apply a partial update to a teacher and its owning user in one transaction
pub async fn update_teacher(
    pool: &SqlitePool,
    teacher_id: i64,
    patch: TeacherPatch<'_>,
) -> Result<Option<TeacherRow>, DataError> {
    let mut tx = pool.begin().await?;

    let Some(current) = fetch_tx(&mut tx, teacher_id).await? else {
        return Ok(None);
    };

    let user_id = current.user_id;

    if let Some(new_email) = patch.email {
        if new_email != current.email && email_in_use(&mut tx, new_email, Some(user_id)).await? {
            return Err(DataError::conflict("Email already in use"));
        }
    }

    let full_name = patch.full_name.unwrap_or(&current.full_name);
    let email = patch.email.unwrap_or(&current.email);
    let subject = patch.subject.or(current.subject.as_deref());
    let department = patch.department.or(current.department.as_deref());
    let employee_code = patch.employee_code.or(current.employee_code.as_deref());
    let phone = patch.phone.or(current.phone.as_deref());
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "UPDATE teachers SET full_name = ?, email = ?, subject = ?, department = ?, \
         employee_code = ?, phone = ?, updated_at = ? WHERE teacher_id = ?",
    )
    .bind(full_name)
    .bind(email)
    .bind(subject)
    .bind(department)
    .bind(employee_code)
    .bind(phone)
    .bind(now)
    .bind(teacher_id)
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
    get_teacher(pool, teacher_id).await
}

/// Delete a teacher profile and its owning user as one atomic unit
pub async fn delete_teacher(pool: &SqlitePool, teacher_id: i64) -> Result<bool, DataError> {
    let mut tx = pool.begin().await?;

    let Some(current) = fetch_tx(&mut tx, teacher_id).await? else {
        return Ok(false);
    };

    sqlx::query("DELETE FROM teachers WHERE teacher_id = ?")
        .bind(teacher_id)
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
    teacher_id: i64,
) -> Result<Option<TeacherRow>, DataError> {
    let sql = format!(
        "SELECT {} FROM teachers WHERE teacher_id = ?",
        TEACHER_COLUMNS
    );
    let row = sqlx::query_as::<_, TeacherTuple>(&sql)
        .bind(teacher_id)
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

    fn tom() -> NewTeacher<'static> {
        NewTeacher {
            full_name: "Tom Teacher",
            email: "tom@school.edu",
            subject: Some("Mathematics"),
            department: Some("Science"),
            employee_code: Some("T-042"),
            phone: Some("+61412345678"),
            password_hash: "hash",
        }
    }

    #[tokio::test]
    async fn test_create_teacher_creates_both_rows() {
        let pool = setup_test_pool().await;
        let teacher = create_teacher(&pool, tom()).await.unwrap();

        assert_eq!(teacher.subject.as_deref(), Some("Mathematics"));
        assert_eq!(teacher.phone.as_deref(), Some("+61412345678"));

        let linked = user::get_user(&pool, teacher.user_id).await.unwrap().unwrap();
        assert_eq!(linked.role, Role::Teacher);
        assert_eq!(linked.email, teacher.email);
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_no_orphan() {
        let pool = setup_test_pool().await;
        create_teacher(&pool, tom()).await.unwrap();

        let err = create_teacher(&pool, tom()).await.unwrap_err();
        assert!(matches!(err, DataError::Conflict(_)));

        let users = user::list_users(&pool, None, 0, 100).await.unwrap();
        assert_eq!(users.len(), 1);
        let teachers = list_teachers(&pool, 0, 100).await.unwrap();
        assert_eq!(teachers.len(), 1);
    }

    #[tokio::test]
    async fn test_update_profile_only_fields() {
        let pool = setup_test_pool().await;
        let teacher = create_teacher(&pool, tom()).await.unwrap();

        let patch = TeacherPatch {
            department: Some("Mathematics"),
            phone: Some("+61498765432"),
            ..Default::default()
        };
        let updated = update_teacher(&pool, teacher.teacher_id, patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.department.as_deref(), Some("Mathematics"));
        assert_eq!(updated.phone.as_deref(), Some("+61498765432"));
        // Untouched fields survive
        assert_eq!(updated.employee_code.as_deref(), Some("T-042"));

        // User row untouched apart from timestamps
        let linked = user::get_user(&pool, teacher.user_id).await.unwrap().unwrap();
        assert_eq!(linked.email, "tom@school.edu");
    }

    #[tokio::test]
    async fn test_update_mirrors_name_and_email() {
        let pool = setup_test_pool().await;
        let teacher = create_teacher(&pool, tom()).await.unwrap();

        let patch = TeacherPatch {
            full_name: Some("Tom Renamed"),
            email: Some("tom.renamed@school.edu"),
            ..Default::default()
        };
        update_teacher(&pool, teacher.teacher_id, patch).await.unwrap();

        let linked = user::get_user(&pool, teacher.user_id).await.unwrap().unwrap();
        assert_eq!(linked.full_name, "Tom Renamed");
        assert_eq!(linked.email, "tom.renamed@school.edu");
    }

    #[tokio::test]
    async fn test_delete_removes_both_rows() {
        let pool = setup_test_pool().await;
        let teacher = create_teacher(&pool, tom()).await.unwrap();

        assert!(delete_teacher(&pool, teacher.teacher_id).await.unwrap());
        assert!(get_teacher(&pool, teacher.teacher_id).await.unwrap().is_none());
        assert!(user::get_user(&pool, teacher.user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_user_id() {
        let pool = setup_test_pool().await;
        let teacher = create_teacher(&pool, tom()).await.unwrap();

        let found = get_by_user_id(&pool, teacher.user_id).await.unwrap().unwrap();
        assert_eq!(found.teacher_id, teacher.teacher_id);
    }
}
