//! Data layer error types

use thiserror::Error;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Domain conflict (duplicate email, overlapping timetable slot)
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DataError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Translate a unique-constraint violation into a `Conflict`, keeping
    /// every other database error as-is. Repositories pre-check uniqueness
    /// inside their transactions, but a concurrent insert can still land
    /// first; the UNIQUE column is the last line of defense.
    pub fn from_unique_violation(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.message().contains("UNIQUE constraint failed") {
                return Self::Conflict(message.to_string());
            }
        }
        Self::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_display() {
        let err = DataError::MigrationFailed {
            version: 2,
            name: "add_notifications".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_notifications) failed: syntax error"
        );
    }

    #[test]
    fn test_conflict_display() {
        let err = DataError::conflict("Email already in use");
        assert_eq!(err.to_string(), "Conflict: Email already in use");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DataError = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }
}
