//! Class repository

use sqlx::SqlitePool;

use crate::data::error::DataError;
use crate::data::types::ClassRow;

/// Create a class, returning its row
pub async fn create_class(pool: &SqlitePool, class_name: &str) -> Result<ClassRow, DataError> {
    let result = sqlx::query("INSERT INTO classes (class_name) VALUES (?)")
        .bind(class_name)
        .execute(pool)
        .await?;

    Ok(ClassRow {
        class_id: result.last_insert_rowid(),
        class_name: class_name.to_string(),
    })
}

/// Get a class by ID
pub async fn get_class(pool: &SqlitePool, class_id: i64) -> Result<Option<ClassRow>, DataError> {
    let row = sqlx::query_as::<_, (i64, String)>(
        "SELECT class_id, class_name FROM classes WHERE class_id = ?",
    )
    .bind(class_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(class_id, class_name)| ClassRow {
        class_id,
        class_name,
    }))
}

/// Find a class by exact name (used by seeding to stay idempotent)
pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<Option<ClassRow>, DataError> {
    let row = sqlx::query_as::<_, (i64, String)>(
        "SELECT class_id, class_name FROM classes WHERE class_name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(class_id, class_name)| ClassRow {
        class_id,
        class_name,
    }))
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
    async fn test_create_and_get_class() {
        let pool = setup_test_pool().await;
        let class = create_class(&pool, "Mathematics").await.unwrap();
        assert!(class.class_id > 0);

        let fetched = get_class(&pool, class.class_id).await.unwrap().unwrap();
        assert_eq!(fetched.class_name, "Mathematics");

        assert!(get_class(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let pool = setup_test_pool().await;
        create_class(&pool, "Science").await.unwrap();

        assert!(get_by_name(&pool, "Science").await.unwrap().is_some());
        assert!(get_by_name(&pool, "History").await.unwrap().is_none());
    }
}
