use sqlx::{Sqlite, SqlitePool, Transaction};

use super::types::*;
use crate::errors::AppError;

pub async fn create_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    input: &NewBusinessIdea,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO business_ideas (title, description, budget_min, budget_max, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.budget_min)
    .bind(input.budget_max)
    .bind(input.created_at)
    .bind(input.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Direct admin creation, outside any larger transaction.
pub async fn create(pool: &SqlitePool, input: &NewBusinessIdea) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;
    let id = create_in_tx(&mut tx, input).await?;
    tx.commit().await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<BusinessIdea>, AppError> {
    let found = sqlx::query_as::<_, BusinessIdea>(
        "SELECT id, title, description, budget_min, budget_max, created_at, updated_at \
         FROM business_ideas WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(found)
}

/// Public listing, newest first.
pub async fn find_paginated(
    pool: &SqlitePool,
    page: i64,
    limit: i64,
) -> Result<BusinessIdeaPage, AppError> {
    let page = page.max(1);
    let limit = limit.clamp(1, 100);
    let offset = (page - 1) * limit;

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM business_ideas")
        .fetch_one(pool)
        .await?;

    let items = sqlx::query_as::<_, BusinessIdea>(
        "SELECT id, title, description, budget_min, budget_max, created_at, updated_at \
         FROM business_ideas ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    Ok(BusinessIdeaPage {
        items,
        page,
        limit,
        total,
        total_pages,
    })
}
