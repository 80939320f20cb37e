//! User repository
//!
//! Users are the identity store: one row per login-capable account. Email
//! uniqueness is global across all roles. Profile rows (students, teachers)
//! mirror name/email and are kept in sync here whenever a user row changes.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::data::error::DataError;
use crate::data::types::{Role, UserCredentials, UserRow};

/// Fields that can change on a user update; `None` leaves the column as-is
#[derive(Debug, Default)]
pub struct UserPatch<'a> {
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub role: Option<Role>,
    pub password_hash: Option<&'a str>,
}

/// Check whether an email is already taken by any user other than `exclude`
pub async fn email_in_use(
    tx: &mut Transaction<'_, Sqlite>,
    email: &str,
    exclude: Option<i64>,
) -> Result<bool, DataError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE email = ? AND user_id != ?",
    )
    .bind(email)
    .bind(exclude.unwrap_or(-1))
    .fetch_one(&mut **tx)
    .await?;
    Ok(count > 0)
}

/// Insert a user row inside an existing transaction, returning its id.
/// Callers are responsible for the duplicate-email pre-check.
pub async fn insert_user(
    tx: &mut Transaction<'_, Sqlite>,
    email: &str,
    full_name: &str,
    role: Role,
    password_hash: &str,
) -> Result<i64, DataError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, full_name, role, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .bind(now)
    .bind(now)
    .execute(&mut **tx)
    .await
    .map_err(|e| DataError::from_unique_violation(e, "Email already in use"))?;

    Ok(result.last_insert_rowid())
}

/// Create a standalone user (no profile row)
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    full_name: &str,
    role: Role,
    password_hash: &str,
) -> Result<UserRow, DataError> {
    let mut tx = pool.begin().await?;

    if email_in_use(&mut tx, email, None).await? {
        return Err(DataError::conflict("Email already in use"));
    }

    let user_id = insert_user(&mut tx, email, full_name, role, password_hash).await?;
    tx.commit().await?;

    get_user(pool, user_id)
        .await?
        .ok_or_else(|| DataError::conflict("User vanished after insert"))
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRow>, DataError> {
    let row = sqlx::query_as::<_, (i64, String, String, Role, i64, i64)>(
        "SELECT user_id, email, full_name, role, created_at, updated_at \
         FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(user_id, email, full_name, role, created_at, updated_at)| UserRow {
            user_id,
            email,
            full_name,
            role,
            created_at,
            updated_at,
        },
    ))
}

/// Get a user's login credentials by exact email
pub async fn get_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserCredentials>, DataError> {
    let row = sqlx::query_as::<_, (i64, String, String, Role, String)>(
        "SELECT user_id, email, full_name, role, password_hash \
         FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(user_id, email, full_name, role, password_hash)| UserCredentials {
            user_id,
            email,
            full_name,
            role,
            password_hash,
        },
    ))
}

/// List users, optionally filtered by role, ordered by id
pub async fn list_users(
    pool: &SqlitePool,
    role: Option<Role>,
    skip: u32,
    limit: u32,
) -> Result<Vec<UserRow>, DataError> {
    let rows = match role {
        Some(role) => {
            sqlx::query_as::<_, (i64, String, String, Role, i64, i64)>(
                "SELECT user_id, email, full_name, role, created_at, updated_at \
                 FROM users WHERE role = ? ORDER BY user_id ASC LIMIT ? OFFSET ?",
            )
            .bind(role)
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, (i64, String, String, Role, i64, i64)>(
                "SELECT user_id, email, full_name, role, created_at, updated_at \
                 FROM users ORDER BY user_id ASC LIMIT ? OFFSET ?",
            )
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows
        .into_iter()
        .map(
            |(user_id, email, full_name, role, created_at, updated_at)| UserRow {
                user_id,
                email,
                full_name,
                role,
                created_at,
                updated_at,
            },
        )
        .collect())
}

/// Apply a partial update to a user, mirroring name/email into any linked
/// profile row in the same transaction.
///
/// Returns `Ok(None)` if the user does not exist. Fails with `Conflict` when
/// the new email belongs to a different user, or when a role change would
/// orphan an existing profile of the old role.
pub async fn update_user(
    pool: &SqlitePool,
    user_id: i64,
    patch: UserPatch<'_>,
) -> Result<Option<UserRow>, DataError> {
    let mut tx = pool.begin().await?;

    let Some(current) = fetch_user_tx(&mut tx, user_id).await? else {
        return Ok(None);
    };

    if let Some(new_email) = patch.email {
        if new_email != current.email && email_in_use(&mut tx, new_email, Some(user_id)).await? {
            return Err(DataError::conflict("Email already in use"));
        }
    }

    let new_role = patch.role.unwrap_or(current.role);
    if new_role != current.role {
        let profile_role = linked_profile_role(&mut tx, user_id).await?;
        if let Some(profile_role) = profile_role {
            if profile_role != new_role {
                return Err(DataError::conflict(format!(
                    "User has a linked {} profile; role cannot change",
                    profile_role
                )));
            }
        }
    }

    let email = patch.email.unwrap_or(&current.email);
    let full_name = patch.full_name.unwrap_or(&current.full_name);
    let now = chrono::Utc::now().timestamp();

    match patch.password_hash {
        Some(hash) => {
            sqlx::query(
                "UPDATE users SET email = ?, full_name = ?, role = ?, password_hash = ?, \
                 updated_at = ? WHERE user_id = ?",
            )
            .bind(email)
            .bind(full_name)
            .bind(new_role)
            .bind(hash)
            .bind(now)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DataError::from_unique_violation(e, "Email already in use"))?;
        }
        None => {
            sqlx::query(
                "UPDATE users SET email = ?, full_name = ?, role = ?, updated_at = ? \
                 WHERE user_id = ?",
            )
            .bind(email)
            .bind(full_name)
            .bind(new_role)
            .bind(now)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DataError::from_unique_violation(e, "Email already in use"))?;
        }
    }

    mirror_into_profiles(&mut tx, user_id, full_name, email, now).await?;

    tx.commit().await?;
    get_user(pool, user_id).await
}

/// Delete a user by ID; linked profile rows go with it (FK cascade)
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<bool, DataError> {
    let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Keep mirrored name/email columns on profile rows equal to the user row
pub(crate) async fn mirror_into_profiles(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    full_name: &str,
    email: &str,
    now: i64,
) -> Result<(), DataError> {
    sqlx::query(
        "UPDATE students SET full_name = ?, email = ?, updated_at = ? WHERE user_id = ?",
    )
    .bind(full_name)
    .bind(email)
    .bind(now)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        "UPDATE teachers SET full_name = ?, email = ?, updated_at = ? WHERE user_id = ?",
    )
    .bind(full_name)
    .bind(email)
    .bind(now)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn fetch_user_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
) -> Result<Option<UserRow>, DataError> {
    let row = sqlx::query_as::<_, (i64, String, String, Role, i64, i64)>(
        "SELECT user_id, email, full_name, role, created_at, updated_at \
         FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(
        |(user_id, email, full_name, role, created_at, updated_at)| UserRow {
            user_id,
            email,
            full_name,
            role,
            created_at,
            updated_at,
        },
    ))
}

/// Which profile type (if any) is linked to this user
async fn linked_profile_role(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
) -> Result<Option<Role>, DataError> {
    let has_student: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut **tx)
            .await?;
    if has_student > 0 {
        return Ok(Some(Role::Student));
    }

    let has_teacher: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM teachers WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut **tx)
            .await?;
    if has_teacher > 0 {
        return Ok(Some(Role::Teacher));
    }

    Ok(None)
}
