use sqlx::SqlitePool;

use super::types::*;
use crate::errors::AppError;

pub async fn create(pool: &SqlitePool, input: &NewUser) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO users (username, password, display_name, is_admin) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.username)
    .bind(&input.password)
    .bind(&input.display_name)
    .bind(input.is_admin)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let found = sqlx::query_as::<_, User>(
        "SELECT id, username, password, display_name, is_admin, created_at \
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(found)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, AppError> {
    let found = sqlx::query_as::<_, User>(
        "SELECT id, username, password, display_name, is_admin, created_at \
         FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(found)
}
