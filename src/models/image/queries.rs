use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::types::*;
use crate::errors::AppError;

/// Insert an image row and its variant rows in one transaction.
pub async fn create_with_variants(
    pool: &SqlitePool,
    original_filename: &str,
    content_type: &str,
    uploaded_at: DateTime<Utc>,
    variants: &[NewVariant],
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO images (original_filename, content_type, uploaded_at) VALUES (?, ?, ?)",
    )
    .bind(original_filename)
    .bind(content_type)
    .bind(uploaded_at)
    .execute(&mut *tx)
    .await?;
    let image_id = result.last_insert_rowid();

    for v in variants {
        sqlx::query(
            "INSERT INTO image_variants (image_id, kind, storage_path, width, height, size) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(image_id)
        .bind(v.kind)
        .bind(&v.storage_path)
        .bind(v.width)
        .bind(v.height)
        .bind(v.size)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(image_id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Image>, AppError> {
    let found = sqlx::query_as::<_, Image>(
        "SELECT id, original_filename, content_type, business_idea_id, uploaded_at \
         FROM images WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(found)
}

pub async fn find_variants(pool: &SqlitePool, image_id: i64) -> Result<Vec<ImageVariant>, AppError> {
    let variants = sqlx::query_as::<_, ImageVariant>(
        "SELECT id, image_id, kind, storage_path, width, height, size \
         FROM image_variants WHERE image_id = ? ORDER BY id ASC",
    )
    .bind(image_id)
    .fetch_all(pool)
    .await?;
    Ok(variants)
}

pub async fn find_for_idea(pool: &SqlitePool, idea_id: i64) -> Result<Vec<Image>, AppError> {
    let images = sqlx::query_as::<_, Image>(
        "SELECT id, original_filename, content_type, business_idea_id, uploaded_at \
         FROM images WHERE business_idea_id = ? ORDER BY id ASC",
    )
    .bind(idea_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}

/// Resolve the exclusive owner of an image.
pub async fn owner_of(pool: &SqlitePool, image_id: i64) -> Result<Option<ImageOwner>, AppError> {
    let Some(image) = find_by_id(pool, image_id).await? else {
        return Ok(None);
    };
    if let Some(idea_id) = image.business_idea_id {
        return Ok(Some(ImageOwner::BusinessIdea(idea_id)));
    }
    let link: Option<(i64,)> = sqlx::query_as(
        "SELECT submission_id FROM submission_images WHERE image_id = ?",
    )
    .bind(image_id)
    .fetch_optional(pool)
    .await?;
    Ok(Some(match link {
        Some((submission_id,)) => ImageOwner::Submission(submission_id),
        None => ImageOwner::Unowned,
    }))
}

/// Move ownership from a submission to a business idea: point the image at
/// the idea and drop the submission link row. Called once per linked image
/// inside the approval transaction; the image row itself is never copied.
pub async fn reassign_to_idea_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    image_id: i64,
    idea_id: i64,
) -> Result<(), AppError> {
    sqlx::query("UPDATE images SET business_idea_id = ? WHERE id = ?")
        .bind(idea_id)
        .bind(image_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM submission_images WHERE image_id = ?")
        .bind(image_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Images with no owner at all, uploaded before `cutoff`. These are upload
/// leftovers and rejected-submission leftovers awaiting the retention sweep.
pub async fn find_unowned_older_than(
    pool: &SqlitePool,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Image>, AppError> {
    let images = sqlx::query_as::<_, Image>(
        "SELECT i.id, i.original_filename, i.content_type, i.business_idea_id, i.uploaded_at \
         FROM images i \
         LEFT JOIN submission_images si ON si.image_id = i.id \
         WHERE i.business_idea_id IS NULL AND si.image_id IS NULL AND i.uploaded_at < ?",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;
    Ok(images)
}

/// Drop a rejected submission's image links, leaving the images unowned for
/// the retention sweep.
pub async fn unlink_submission_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    submission_id: i64,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM submission_images WHERE submission_id = ?")
        .bind(submission_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

/// Delete an image row; variant rows cascade.
pub async fn delete(pool: &SqlitePool, image_id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM images WHERE id = ?")
        .bind(image_id)
        .execute(pool)
        .await?;
    Ok(())
}
