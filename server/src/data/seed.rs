//! Demo data seeding
//!
//! Upserts three demo accounts (one per role) with linked profiles for the
//! student and teacher, plus a couple of classes. Safe to run repeatedly:
//! existing rows are refreshed, not duplicated.

use sqlx::SqlitePool;

use super::error::DataError;
use super::repositories::{class, student, teacher, user};
use crate::api::auth::password::hash_password;
use crate::data::types::Role;

/// Insert or refresh the demo accounts and classes
pub async fn seed(pool: &SqlitePool) -> Result<(), DataError> {
    seed_student(pool, "alice@student.edu", "Alice Student", "student123").await?;
    seed_teacher(pool, "tom@school.edu", "Tom Teacher", "teacher123").await?;
    seed_admin(pool, "amara@school.edu", "Amara Admin", "admin123").await?;

    seed_class(pool, "Mathematics").await?;
    seed_class(pool, "Science").await?;

    tracing::info!("Seeding complete");
    Ok(())
}

async fn seed_student(
    pool: &SqlitePool,
    email: &str,
    full_name: &str,
    plain_password: &str,
) -> Result<(), DataError> {
    let hash = hash_password(plain_password)
        .map_err(|e| DataError::conflict(format!("Password hashing failed: {}", e)))?;

    match user::get_credentials_by_email(pool, email).await? {
        Some(existing) => {
            if let Some(profile) = student::get_by_user_id(pool, existing.user_id).await? {
                student::update_student(
                    pool,
                    profile.student_id,
                    student::StudentPatch {
                        full_name: Some(full_name),
                        password_hash: Some(&hash),
                        ..Default::default()
                    },
                )
                .await?;
                tracing::info!(email, "Updated student");
            }
        }
        None => {
            student::create_student(
                pool,
                student::NewStudent {
                    full_name,
                    email,
                    grade: Some("8"),
                    section: "A",
                    password_hash: &hash,
                },
            )
            .await?;
            tracing::info!(email, "Inserted student");
        }
    }
    Ok(())
}

async fn seed_teacher(
    pool: &SqlitePool,
    email: &str,
    full_name: &str,
    plain_password: &str,
) -> Result<(), DataError> {
    let hash = hash_password(plain_password)
        .map_err(|e| DataError::conflict(format!("Password hashing failed: {}", e)))?;

    match user::get_credentials_by_email(pool, email).await? {
        Some(existing) => {
            if let Some(profile) = teacher::get_by_user_id(pool, existing.user_id).await? {
                teacher::update_teacher(
                    pool,
                    profile.teacher_id,
                    teacher::TeacherPatch {
                        full_name: Some(full_name),
                        password_hash: Some(&hash),
                        ..Default::default()
                    },
                )
                .await?;
                tracing::info!(email, "Updated teacher");
            }
        }
        None => {
            teacher::create_teacher(
                pool,
                teacher::NewTeacher {
                    full_name,
                    email,
                    subject: Some("Mathematics"),
                    department: Some("Science"),
                    employee_code: Some("T-001"),
                    phone: Some("+61412345678"),
                    password_hash: &hash,
                },
            )
            .await?;
            tracing::info!(email, "Inserted teacher");
        }
    }
    Ok(())
}

async fn seed_admin(
    pool: &SqlitePool,
    email: &str,
    full_name: &str,
    plain_password: &str,
) -> Result<(), DataError> {
    let hash = hash_password(plain_password)
        .map_err(|e| DataError::conflict(format!("Password hashing failed: {}", e)))?;

    match user::get_credentials_by_email(pool, email).await? {
        Some(existing) => {
            user::update_user(
                pool,
                existing.user_id,
                user::UserPatch {
                    full_name: Some(full_name),
                    password_hash: Some(&hash),
                    ..Default::default()
                },
            )
            .await?;
            tracing::info!(email, "Updated admin");
        }
        None => {
            user::create_user(pool, email, full_name, Role::Admin, &hash).await?;
            tracing::info!(email, "Inserted admin");
        }
    }
    Ok(())
}

async fn seed_class(pool: &SqlitePool, name: &str) -> Result<(), DataError> {
    if class::get_by_name(pool, name).await?.is_none() {
        class::create_class(pool, name).await?;
        tracing::info!(name, "Inserted class");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[tokio::test]
    async fn test_seed_creates_accounts_and_profiles() {
        let pool = setup_test_pool().await;
        seed(&pool).await.unwrap();

        let alice = user::get_credentials_by_email(&pool, "alice@student.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alice.role, Role::Student);
        assert!(student::get_by_user_id(&pool, alice.user_id)
            .await
            .unwrap()
            .is_some());

        let tom = user::get_credentials_by_email(&pool, "tom@school.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tom.role, Role::Teacher);
        assert!(teacher::get_by_user_id(&pool, tom.user_id)
            .await
            .unwrap()
            .is_some());

        let amara = user::get_credentials_by_email(&pool, "amara@school.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(amara.role, Role::Admin);

        assert!(class::get_by_name(&pool, "Mathematics").await.unwrap().is_some());
        assert!(class::get_by_name(&pool, "Science").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = setup_test_pool().await;
        seed(&pool).await.unwrap();
        seed(&pool).await.unwrap();

        let users = user::list_users(&pool, None, 0, 100).await.unwrap();
        assert_eq!(users.len(), 3);
        let students = student::list_students(&pool, 0, 100).await.unwrap();
        assert_eq!(students.len(), 1);
    }
}
