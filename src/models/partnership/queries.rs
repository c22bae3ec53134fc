use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::types::*;
use crate::errors::AppError;

const SELECT_COLS: &str =
    "id, business_idea_id, name, phone_number, role, status, created_at, updated_at";

pub async fn create(
    pool: &SqlitePool,
    business_idea_id: i64,
    input: &NewPartnershipRequest,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO partnership_requests (business_idea_id, name, phone_number, role) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(business_idea_id)
    .bind(input.name.trim())
    .bind(input.phone_number.trim())
    .bind(input.role)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<PartnershipRequest>, AppError> {
    let sql = format!("SELECT {SELECT_COLS} FROM partnership_requests WHERE id = ?");
    let found = sqlx::query_as::<_, PartnershipRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found)
}

/// Admin listing, newest first, optionally narrowed by status or idea.
pub async fn find_paginated(
    pool: &SqlitePool,
    page: i64,
    limit: i64,
    status: Option<PartnershipStatus>,
    business_idea_id: Option<i64>,
) -> Result<PartnershipPage, AppError> {
    let page = page.max(1);
    let limit = limit.clamp(1, 100);
    let offset = (page - 1) * limit;

    let apply = |builder: &mut QueryBuilder<'_, Sqlite>| {
        builder.push(" WHERE 1 = 1");
        if let Some(s) = status {
            builder.push(" AND status = ").push_bind(s);
        }
        if let Some(idea_id) = business_idea_id {
            builder.push(" AND business_idea_id = ").push_bind(idea_id);
        }
    };

    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM partnership_requests");
    apply(&mut count_builder);
    let total: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

    let mut builder = QueryBuilder::new(format!("SELECT {SELECT_COLS} FROM partnership_requests"));
    apply(&mut builder);
    builder
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let items = builder
        .build_query_as::<PartnershipRequest>()
        .fetch_all(pool)
        .await?;

    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    Ok(PartnershipPage {
        items,
        page,
        limit,
        total,
        total_pages,
    })
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: PartnershipStatus,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE partnership_requests \
         SET status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ?",
    )
    .bind(status)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}
