use chrono::{DateTime, Duration, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};

use super::types::*;
use crate::errors::AppError;

const SELECT_COLS: &str = "id, title, description, budget_min, budget_max, contact_email, \
     contact_phone, submitter_ip, status, rejection_reason, flagged_for_review, flag_reason, \
     approved_by_id, rejected_by_id, business_idea_id, submitted_at, reviewed_at";

/// Insert a submission row inside an open transaction. Returns the new id.
pub async fn create_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    input: &NewSubmission,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO submissions (title, description, budget_min, budget_max, contact_email, \
         contact_phone, submitter_ip, status, flagged_for_review, flag_reason, submitted_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 'PENDING', ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.budget_min)
    .bind(input.budget_max)
    .bind(&input.contact_email)
    .bind(&input.contact_phone)
    .bind(&input.submitter_ip)
    .bind(input.flagged_for_review)
    .bind(&input.flag_reason)
    .bind(input.submitted_at)
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Link images to a submission, preserving the supplied order.
pub async fn link_images_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    submission_id: i64,
    image_ids: &[i64],
) -> Result<(), AppError> {
    for (position, image_id) in image_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO submission_images (submission_id, image_id, position) VALUES (?, ?, ?)",
        )
        .bind(submission_id)
        .bind(image_id)
        .bind(position as i64)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Image ids linked to a submission, in display order.
pub async fn linked_image_ids(
    pool: &SqlitePool,
    submission_id: i64,
) -> Result<Vec<i64>, AppError> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT image_id FROM submission_images WHERE submission_id = ? ORDER BY position ASC",
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

pub async fn linked_image_ids_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    submission_id: i64,
) -> Result<Vec<i64>, AppError> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT image_id FROM submission_images WHERE submission_id = ? ORDER BY position ASC",
    )
    .bind(submission_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Submission>, AppError> {
    let sql = format!("SELECT {SELECT_COLS} FROM submissions WHERE id = ?");
    let found = sqlx::query_as::<_, Submission>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found)
}

pub async fn find_by_id_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> Result<Option<Submission>, AppError> {
    let sql = format!("SELECT {SELECT_COLS} FROM submissions WHERE id = ?");
    let found = sqlx::query_as::<_, Submission>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(found)
}

fn apply_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &SubmissionFilter) {
    builder.push(" WHERE status = 'PENDING'");

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        builder
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND submitted_at >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND submitted_at <= ").push_bind(to);
    }
    if let Some(has_contact) = filter.has_contact {
        if has_contact {
            builder.push(" AND (contact_email IS NOT NULL OR contact_phone IS NOT NULL)");
        } else {
            builder.push(" AND contact_email IS NULL AND contact_phone IS NULL");
        }
    }
    if let Some(flagged) = filter.flagged {
        builder
            .push(" AND flagged_for_review = ")
            .push_bind(flagged);
    }
}

/// Filtered, paginated listing of pending submissions, newest first.
/// Terminal submissions never appear regardless of filter combination.
pub async fn find_pending(
    pool: &SqlitePool,
    filter: &SubmissionFilter,
) -> Result<SubmissionPage, AppError> {
    let page = filter.page.unwrap_or(1).max(1);
    let limit = filter.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM submissions");
    apply_filters(&mut count_builder, filter);
    let total: i64 = count_builder
        .build_query_scalar()
        .fetch_one(pool)
        .await?;

    let mut builder = QueryBuilder::new(format!("SELECT {SELECT_COLS} FROM submissions"));
    apply_filters(&mut builder, filter);
    builder
        .push(" ORDER BY submitted_at DESC, id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let items = builder
        .build_query_as::<Submission>()
        .fetch_all(pool)
        .await?;

    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    Ok(SubmissionPage {
        items,
        page,
        limit,
        total,
        total_pages,
    })
}

/// Flip a PENDING submission to APPROVED. Guarded by status in the WHERE
/// clause so a concurrent second approval affects zero rows.
pub async fn mark_approved_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    reviewer_id: i64,
    business_idea_id: i64,
    reviewed_at: DateTime<Utc>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE submissions \
         SET status = 'APPROVED', approved_by_id = ?, business_idea_id = ?, reviewed_at = ?, \
             updated_at = ? \
         WHERE id = ? AND status = 'PENDING'",
    )
    .bind(reviewer_id)
    .bind(business_idea_id)
    .bind(reviewed_at)
    .bind(reviewed_at)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Flip a PENDING submission to REJECTED. Same guard as approval.
pub async fn mark_rejected_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    reviewer_id: i64,
    reason: Option<&str>,
    reviewed_at: DateTime<Utc>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE submissions \
         SET status = 'REJECTED', rejected_by_id = ?, rejection_reason = ?, reviewed_at = ?, \
             updated_at = ? \
         WHERE id = ? AND status = 'PENDING'",
    )
    .bind(reviewer_id)
    .bind(reason)
    .bind(reviewed_at)
    .bind(reviewed_at)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Overwrite the editable fields of a PENDING submission.
pub async fn update_fields_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    title: &str,
    description: &str,
    budget_min: i64,
    budget_max: i64,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE submissions \
         SET title = ?, description = ?, budget_min = ?, budget_max = ?, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ? AND status = 'PENDING'",
    )
    .bind(title)
    .bind(description)
    .bind(budget_min)
    .bind(budget_max)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Toggle the review flag on a PENDING submission.
pub async fn set_flag_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    flagged: bool,
    reason: Option<&str>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE submissions \
         SET flagged_for_review = ?, flag_reason = ?, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ? AND status = 'PENDING'",
    )
    .bind(flagged)
    .bind(reason)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Aggregate moderation counters as of `now`.
pub async fn stats(pool: &SqlitePool, now: DateTime<Utc>) -> Result<SubmissionStats, AppError> {
    let cutoff = now - Duration::days(30);

    let (pending,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM submissions WHERE status = 'PENDING'")
            .fetch_one(pool)
            .await?;
    let (approved,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM submissions WHERE status = 'APPROVED'")
            .fetch_one(pool)
            .await?;
    let (rejected,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM submissions WHERE status = 'REJECTED'")
            .fetch_one(pool)
            .await?;
    let (approved_recent,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM submissions WHERE status = 'APPROVED' AND reviewed_at >= ?",
    )
    .bind(cutoff)
    .fetch_one(pool)
    .await?;
    let (rejected_recent,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM submissions WHERE status = 'REJECTED' AND reviewed_at >= ?",
    )
    .bind(cutoff)
    .fetch_one(pool)
    .await?;
    let (flagged_count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM submissions WHERE status = 'PENDING' AND flagged_for_review = 1",
    )
    .fetch_one(pool)
    .await?;

    // Mean review turnaround, computed in Rust to stay independent of how the
    // store renders timestamps.
    let reviewed: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
        "SELECT submitted_at, reviewed_at FROM submissions WHERE reviewed_at IS NOT NULL",
    )
    .fetch_all(pool)
    .await?;

    let average_review_time_hours = if reviewed.is_empty() {
        0.0
    } else {
        let total_secs: i64 = reviewed
            .iter()
            .map(|(submitted, done)| (*done - *submitted).num_seconds().max(0))
            .sum();
        total_secs as f64 / reviewed.len() as f64 / 3600.0
    };

    Ok(SubmissionStats {
        pending,
        approved,
        rejected,
        approved_last_30_days: approved_recent,
        rejected_last_30_days: rejected_recent,
        flagged_count,
        average_review_time_hours,
    })
}
