//! Material repository
//!
//! Rows are owned by a teacher profile (`teacher_id`). Visibility for
//! students: grade must match, and `target_section` NULL means the whole
//! grade while a concrete value restricts to that section.

use sqlx::SqlitePool;

use crate::data::error::DataError;
use crate::data::types::{MaterialRow, MaterialWithTeacher};

/// Input for persisting an uploaded material
#[derive(Debug)]
pub struct NewMaterial<'a> {
    pub teacher_id: i64,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub subject: Option<&'a str>,
    /// Path relative to the upload root
    pub file_path: &'a str,
    pub target_grade: &'a str,
    pub target_section: Option<&'a str>,
}

type MaterialTuple = (
    i64,
    i64,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    Option<String>,
    i64,
);

const MATERIAL_COLUMNS: &str = "material_id, teacher_id, title, description, subject, \
                                file_path, target_grade, target_section, created_at";

fn to_row(
    (material_id, teacher_id, title, description, subject, file_path, target_grade, target_section, created_at): MaterialTuple,
) -> MaterialRow {
    MaterialRow {
        material_id,
        teacher_id,
        title,
        description,
        subject,
        file_path,
        target_grade,
        target_section,
        created_at,
    }
}

/// Persist a material row
pub async fn create_material(
    pool: &SqlitePool,
    new: NewMaterial<'_>,
) -> Result<MaterialRow, DataError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO materials (teacher_id, title, description, subject, file_path, \
         target_grade, target_section, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(new.teacher_id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.subject)
    .bind(new.file_path)
    .bind(new.target_grade)
    .bind(new.target_section)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(MaterialRow {
        material_id: result.last_insert_rowid(),
        teacher_id: new.teacher_id,
        title: new.title.to_string(),
        description: new.description.map(String::from),
        subject: new.subject.map(String::from),
        file_path: new.file_path.to_string(),
        target_grade: new.target_grade.to_string(),
        target_section: new.target_section.map(String::from),
        created_at: now,
    })
}

/// Get a material by ID
pub async fn get_material(
    pool: &SqlitePool,
    material_id: i64,
) -> Result<Option<MaterialRow>, DataError> {
    let sql = format!(
        "SELECT {} FROM materials WHERE material_id = ?",
        MATERIAL_COLUMNS
    );
    let row = sqlx::query_as::<_, MaterialTuple>(&sql)
        .bind(material_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(to_row))
}

/// List a teacher's uploads, newest first
pub async fn list_by_teacher(
    pool: &SqlitePool,
    teacher_id: i64,
) -> Result<Vec<MaterialRow>, DataError> {
    let sql = format!(
        "SELECT {} FROM materials WHERE teacher_id = ? \
         ORDER BY created_at DESC, material_id DESC",
        MATERIAL_COLUMNS
    );
    let rows = sqlx::query_as::<_, MaterialTuple>(&sql)
        .bind(teacher_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(to_row).collect())
}

/// Materials visible to a student: grade matches, and either the material
/// targets the whole grade or exactly the student's section. A student with
/// no recorded section sees whole-grade materials only.
pub async fn list_for_student(
    pool: &SqlitePool,
    grade: &str,
    section: Option<&str>,
) -> Result<Vec<MaterialWithTeacher>, DataError> {
    let base = format!(
        "SELECT m.material_id, m.teacher_id, m.title, m.description, m.subject, \
                m.file_path, m.target_grade, m.target_section, m.created_at, t.full_name \
         FROM materials m \
         LEFT JOIN teachers t ON m.teacher_id = t.teacher_id \
         WHERE m.target_grade = ? AND {} \
         ORDER BY m.created_at DESC, m.material_id DESC",
        match section {
            Some(_) => "(m.target_section IS NULL OR m.target_section = ?)",
            None => "m.target_section IS NULL",
        }
    );

    type WithTeacherTuple = (
        i64,
        i64,
        String,
        Option<String>,
        Option<String>,
        String,
        String,
        Option<String>,
        i64,
        Option<String>,
    );

    let mut query = sqlx::query_as::<_, WithTeacherTuple>(&base).bind(grade);
    if let Some(section) = section {
        query = query.bind(section);
    }
    let rows = query.fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(
            |(material_id, teacher_id, title, description, subject, file_path, target_grade, target_section, created_at, teacher_name)| {
                MaterialWithTeacher {
                    material: MaterialRow {
                        material_id,
                        teacher_id,
                        title,
                        description,
                        subject,
                        file_path,
                        target_grade,
                        target_section,
                        created_at,
                    },
                    teacher_name,
                }
            },
        )
        .collect())
}

/// Delete a material row
pub async fn delete_material(pool: &SqlitePool, material_id: i64) -> Result<bool, DataError> {
    let result = sqlx::query("DELETE FROM materials WHERE material_id = ?")
        .bind(material_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repositories::teacher;
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

    async fn make_teacher(pool: &SqlitePool) -> i64 {
        teacher::create_teacher(
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
        .unwrap()
        .teacher_id
    }

    fn material<'a>(teacher_id: i64, title: &'a str, grade: &'a str, section: Option<&'a str>) -> NewMaterial<'a> {
        NewMaterial {
            teacher_id,
            title,
            description: None,
            subject: Some("Mathematics"),
            file_path: "materials/abc123.pdf",
            target_grade: grade,
            target_section: section,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_mine() {
        let pool = setup_test_pool().await;
        let teacher_id = make_teacher(&pool).await;

        create_material(&pool, material(teacher_id, "Algebra", "8", None))
            .await
            .unwrap();
        create_material(&pool, material(teacher_id, "Fractions", "8", Some("A")))
            .await
            .unwrap();

        let mine = list_by_teacher(&pool, teacher_id).await.unwrap();
        assert_eq!(mine.len(), 2);

        assert!(list_by_teacher(&pool, 999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whole_grade_material_visible_to_every_section() {
        let pool = setup_test_pool().await;
        let teacher_id = make_teacher(&pool).await;
        create_material(&pool, material(teacher_id, "Algebra", "8", None))
            .await
            .unwrap();

        let for_a = list_for_student(&pool, "8", Some("A")).await.unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].teacher_name.as_deref(), Some("Tom Teacher"));

        let for_b = list_for_student(&pool, "8", Some("B")).await.unwrap();
        assert_eq!(for_b.len(), 1);

        // Wrong grade sees nothing
        assert!(list_for_student(&pool, "9", Some("A")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sectioned_material_restricted() {
        let pool = setup_test_pool().await;
        let teacher_id = make_teacher(&pool).await;
        create_material(&pool, material(teacher_id, "Extension work", "8", Some("A")))
            .await
            .unwrap();

        assert_eq!(list_for_student(&pool, "8", Some("A")).await.unwrap().len(), 1);
        assert!(list_for_student(&pool, "8", Some("B")).await.unwrap().is_empty());
        // No recorded section: whole-grade only
        assert!(list_for_student(&pool, "8", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_material() {
        let pool = setup_test_pool().await;
        let teacher_id = make_teacher(&pool).await;
        let row = create_material(&pool, material(teacher_id, "Algebra", "8", None))
            .await
            .unwrap();

        assert!(delete_material(&pool, row.material_id).await.unwrap());
        assert!(get_material(&pool, row.material_id).await.unwrap().is_none());
        assert!(!delete_material(&pool, row.material_id).await.unwrap());
    }
}
