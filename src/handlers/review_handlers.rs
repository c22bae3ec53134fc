use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::audit;
use crate::auth::session::require_admin;
use crate::errors::AppError;
use crate::handlers::ok_json;
use crate::moderation::{self, ApproveOverrides, EditSubmission};
use crate::models::submission::{SubmissionFilter, queries as submission_queries};

/// GET /api/admin/submissions/pending
pub async fn pending(
    pool: web::Data<SqlitePool>,
    session: Session,
    query: web::Query<SubmissionFilter>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let page = moderation::get_pending_submissions(&pool, &query).await?;
    Ok(ok_json(page))
}

/// GET /api/admin/submissions/{id} - submission detail with its audit trail.
pub async fn detail(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let id = path.into_inner();
    let submission = moderation::get_submission(&pool, id).await?;
    let image_ids = submission_queries::linked_image_ids(&pool, id).await?;
    let trail = audit::find_for_submission(&pool, id).await?;
    Ok(ok_json(json!({
        "submission": submission,
        "imageIds": image_ids,
        "auditLog": trail,
    })))
}

/// PATCH /api/admin/submissions/{id}/approve
pub async fn approve(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    body: Option<web::Json<ApproveOverrides>>,
) -> Result<HttpResponse, AppError> {
    let reviewer_id = require_admin(&session)?;
    let overrides = body.map(|b| b.into_inner()).unwrap_or_default();
    let outcome =
        moderation::approve_submission(&pool, path.into_inner(), reviewer_id, &overrides).await?;
    Ok(ok_json(outcome))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReasonBody {
    pub reason: Option<String>,
}

/// PATCH /api/admin/submissions/{id}/reject
pub async fn reject(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    body: Option<web::Json<ReasonBody>>,
) -> Result<HttpResponse, AppError> {
    let reviewer_id = require_admin(&session)?;
    let reason = body.and_then(|b| b.into_inner().reason);
    let submission =
        moderation::reject_submission(&pool, path.into_inner(), reviewer_id, reason.as_deref())
            .await?;
    Ok(ok_json(submission))
}

/// PATCH /api/admin/submissions/{id}/flag
pub async fn flag(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    body: Option<web::Json<ReasonBody>>,
) -> Result<HttpResponse, AppError> {
    let actor_id = require_admin(&session)?;
    let reason = body.and_then(|b| b.into_inner().reason);
    let submission =
        moderation::flag_submission(&pool, path.into_inner(), actor_id, reason.as_deref()).await?;
    Ok(ok_json(submission))
}

/// PATCH /api/admin/submissions/{id}/unflag
pub async fn unflag(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor_id = require_admin(&session)?;
    let submission = moderation::unflag_submission(&pool, path.into_inner(), actor_id).await?;
    Ok(ok_json(submission))
}

/// PATCH /api/admin/submissions/{id} - edit a still-pending submission.
pub async fn edit(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<EditSubmission>,
) -> Result<HttpResponse, AppError> {
    let actor_id = require_admin(&session)?;
    let submission =
        moderation::edit_submission(&pool, path.into_inner(), actor_id, &body).await?;
    Ok(ok_json(submission))
}

/// GET /api/admin/submissions/stats
pub async fn stats(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let stats = moderation::get_submission_stats(&pool).await?;
    Ok(ok_json(stats))
}
