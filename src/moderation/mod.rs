//! Moderation workflow for anonymous submissions.
//!
//! Orchestrates creation, review listing, approval, rejection, and flagging.
//! Every state-changing operation runs as one transaction covering the
//! status flip, any business-idea creation, image re-ownership, and the
//! audit entry, so a concurrent second reviewer observes the already-updated
//! status and fails with a state error instead of double-publishing.

pub mod cleanup;
pub mod scorer;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::audit::{self, AuditAction, OverrideDiff};
use crate::auth::validate;
use crate::errors::{AppError, FieldError};
use crate::models::business_idea::{self, BusinessIdea, NewBusinessIdea};
use crate::models::image;
use crate::models::submission::{self, NewSubmission, Submission, SubmissionFilter,
    SubmissionPage, SubmissionStats, SubmissionStatus};
use scorer::{SpamCheckFields, detect_spam_patterns};

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 5000;
pub const REJECTION_REASON_MAX: usize = 1000;
pub const SEARCH_MAX: usize = 200;
pub const MAX_IMAGES: usize = 10;

/// Anonymous submission payload, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmission {
    pub title: String,
    pub description: String,
    pub budget_min: i64,
    pub budget_max: i64,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub image_ids: Vec<i64>,
}

/// Reviewer-supplied field substitutions applied at approval time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
}

/// Editable fields of a still-pending submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSubmission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    pub business_idea: BusinessIdea,
    pub submission: Submission,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_create(input: &CreateSubmission) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(msg) = validate::validate_length(&input.title, "Title", 1, TITLE_MAX) {
        errors.push(FieldError::new("title", msg));
    }
    if let Some(msg) =
        validate::validate_length(&input.description, "Description", DESCRIPTION_MIN, DESCRIPTION_MAX)
    {
        errors.push(FieldError::new("description", msg));
    }
    if let Some(msg) = validate::validate_budget_range(input.budget_min, input.budget_max) {
        errors.push(FieldError::new("budgetMin", msg));
    }

    let email = non_empty(input.contact_email.as_ref());
    let phone = non_empty(input.contact_phone.as_ref());
    if email.is_none() && phone.is_none() {
        errors.push(FieldError::new(
            "contactEmail",
            "At least one of contact email or contact phone is required",
        ));
    }
    if let Some(email) = &email {
        if let Some(msg) = validate::validate_email(email) {
            errors.push(FieldError::new("contactEmail", msg));
        }
    }
    if let Some(phone) = &phone {
        if let Some(msg) = validate::validate_phone(phone) {
            errors.push(FieldError::new("contactPhone", msg));
        }
    }

    if input.image_ids.is_empty() || input.image_ids.len() > MAX_IMAGES {
        errors.push(FieldError::new(
            "imageIds",
            format!("Between 1 and {MAX_IMAGES} images are required"),
        ));
    }

    errors
}

/// Create a PENDING submission from an anonymous payload.
///
/// Validates all fields before any write, scores the free-text and contact
/// fields for spam (flagging the row when the score crosses the review
/// threshold), links the supplied images, and appends the CREATED audit
/// entry - all in one transaction.
pub async fn create_submission(
    pool: &SqlitePool,
    input: &CreateSubmission,
    submitter_ip: &str,
) -> Result<Submission, AppError> {
    let errors = validate_create(input);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let email = non_empty(input.contact_email.as_ref());
    let phone = non_empty(input.contact_phone.as_ref());

    let analysis = detect_spam_patterns(&SpamCheckFields {
        title: input.title.trim(),
        description: input.description.trim(),
        contact_email: email.as_deref(),
        contact_phone: phone.as_deref(),
    });
    let flag_reason = analysis
        .should_flag
        .then(|| analysis.reasons.first().cloned())
        .flatten();

    let new = NewSubmission {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        budget_min: input.budget_min,
        budget_max: input.budget_max,
        contact_email: email,
        contact_phone: phone,
        submitter_ip: submitter_ip.to_string(),
        flagged_for_review: analysis.should_flag,
        flag_reason,
        submitted_at: Utc::now(),
    };

    let mut tx = pool.begin().await?;

    // Every referenced image must exist and be unowned; anything else would
    // break ownership exclusivity.
    for &image_id in &input.image_ids {
        let owned: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT business_idea_id FROM images WHERE id = ?")
                .bind(image_id)
                .fetch_optional(&mut *tx)
                .await?;
        let linked: Option<(i64,)> =
            sqlx::query_as("SELECT submission_id FROM submission_images WHERE image_id = ?")
                .bind(image_id)
                .fetch_optional(&mut *tx)
                .await?;
        let available = matches!(owned, Some((None,))) && linked.is_none();
        if !available {
            return Err(AppError::validation(
                "imageIds",
                format!("Image {image_id} does not exist or is already attached"),
            ));
        }
    }

    let id = submission::queries::create_in_tx(&mut tx, &new).await?;
    submission::queries::link_images_in_tx(&mut tx, id, &input.image_ids).await?;
    audit::log_in_tx(
        &mut tx,
        id,
        None,
        &AuditAction::Created {
            spam_confidence: analysis.confidence,
            flagged: analysis.should_flag,
        },
    )
    .await?;
    tx.commit().await?;

    submission::queries::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Filtered page of pending submissions, newest first.
pub async fn get_pending_submissions(
    pool: &SqlitePool,
    filter: &SubmissionFilter,
) -> Result<SubmissionPage, AppError> {
    if let Some(search) = filter.search.as_deref() {
        if search.len() > SEARCH_MAX {
            return Err(AppError::validation(
                "search",
                format!("Search must be at most {SEARCH_MAX} characters"),
            ));
        }
    }
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            return Err(AppError::validation("dateFrom", "dateFrom must not be after dateTo"));
        }
    }
    submission::queries::find_pending(pool, filter).await
}

pub async fn get_submission(pool: &SqlitePool, id: i64) -> Result<Submission, AppError> {
    submission::queries::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Approve a pending submission: publish it as a business idea (with any
/// reviewer overrides substituted), transfer image ownership to the new
/// idea, and close out the submission - atomically.
pub async fn approve_submission(
    pool: &SqlitePool,
    submission_id: i64,
    reviewer_id: i64,
    overrides: &ApproveOverrides,
) -> Result<ApprovalOutcome, AppError> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let current = submission::queries::find_by_id_in_tx(&mut tx, submission_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if current.status != SubmissionStatus::Pending {
        return Err(AppError::State(format!(
            "Cannot approve submission with status {}",
            current.status.as_str()
        )));
    }

    let title = non_empty(overrides.title.as_ref()).unwrap_or_else(|| current.title.clone());
    let description =
        non_empty(overrides.description.as_ref()).unwrap_or_else(|| current.description.clone());
    let budget_min = overrides.budget_min.unwrap_or(current.budget_min);
    let budget_max = overrides.budget_max.unwrap_or(current.budget_max);

    // Overrides face the same constraints as original input.
    let mut errors = Vec::new();
    if let Some(msg) = validate::validate_length(&title, "Title", 1, TITLE_MAX) {
        errors.push(FieldError::new("title", msg));
    }
    if let Some(msg) =
        validate::validate_length(&description, "Description", DESCRIPTION_MIN, DESCRIPTION_MAX)
    {
        errors.push(FieldError::new("description", msg));
    }
    if let Some(msg) = validate::validate_budget_range(budget_min, budget_max) {
        errors.push(FieldError::new("budgetMin", msg));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let diffs = override_diffs(&current, &title, &description, budget_min, budget_max);

    // created_at is the approval time, not the original submission time.
    let idea_id = business_idea::queries::create_in_tx(
        &mut tx,
        &NewBusinessIdea {
            title,
            description,
            budget_min,
            budget_max,
            created_at: now,
        },
    )
    .await?;

    let image_ids = submission::queries::linked_image_ids_in_tx(&mut tx, submission_id).await?;
    for image_id in &image_ids {
        image::queries::reassign_to_idea_in_tx(&mut tx, *image_id, idea_id).await?;
    }

    let updated =
        submission::queries::mark_approved_in_tx(&mut tx, submission_id, reviewer_id, idea_id, now)
            .await?;
    if !updated {
        // Lost the race: another reviewer closed this submission first.
        return Err(AppError::State(
            "Cannot approve submission: no longer pending".to_string(),
        ));
    }

    audit::log_in_tx(
        &mut tx,
        submission_id,
        Some(reviewer_id),
        &AuditAction::Approved {
            business_idea_id: idea_id,
            overrides: diffs,
        },
    )
    .await?;
    tx.commit().await?;

    let business_idea = business_idea::queries::find_by_id(pool, idea_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let submission = get_submission(pool, submission_id).await?;
    Ok(ApprovalOutcome {
        business_idea,
        submission,
    })
}

fn override_diffs(
    current: &Submission,
    title: &str,
    description: &str,
    budget_min: i64,
    budget_max: i64,
) -> Vec<OverrideDiff> {
    let mut diffs = Vec::new();
    if title != current.title {
        diffs.push(OverrideDiff {
            field: "title".to_string(),
            old: current.title.clone(),
            new: title.to_string(),
        });
    }
    if description != current.description {
        diffs.push(OverrideDiff {
            field: "description".to_string(),
            old: current.description.clone(),
            new: description.to_string(),
        });
    }
    if budget_min != current.budget_min {
        diffs.push(OverrideDiff {
            field: "budgetMin".to_string(),
            old: current.budget_min.to_string(),
            new: budget_min.to_string(),
        });
    }
    if budget_max != current.budget_max {
        diffs.push(OverrideDiff {
            field: "budgetMax".to_string(),
            old: current.budget_max.to_string(),
            new: budget_max.to_string(),
        });
    }
    diffs
}

/// Reject a pending submission. No business idea is created; linked images
/// are unlinked and left for the retention sweep.
pub async fn reject_submission(
    pool: &SqlitePool,
    submission_id: i64,
    reviewer_id: i64,
    reason: Option<&str>,
) -> Result<Submission, AppError> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    if let Some(r) = reason {
        if r.len() > REJECTION_REASON_MAX {
            return Err(AppError::validation(
                "reason",
                format!("Rejection reason must be at most {REJECTION_REASON_MAX} characters"),
            ));
        }
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let current = submission::queries::find_by_id_in_tx(&mut tx, submission_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if current.status != SubmissionStatus::Pending {
        return Err(AppError::State(format!(
            "Cannot reject submission with status {}",
            current.status.as_str()
        )));
    }

    let updated =
        submission::queries::mark_rejected_in_tx(&mut tx, submission_id, reviewer_id, reason, now)
            .await?;
    if !updated {
        return Err(AppError::State(
            "Cannot reject submission: no longer pending".to_string(),
        ));
    }

    image::queries::unlink_submission_in_tx(&mut tx, submission_id).await?;

    audit::log_in_tx(
        &mut tx,
        submission_id,
        Some(reviewer_id),
        &AuditAction::Rejected {
            reason: reason.map(String::from),
        },
    )
    .await?;
    tx.commit().await?;

    get_submission(pool, submission_id).await
}

/// Mark a pending submission for closer human review.
pub async fn flag_submission(
    pool: &SqlitePool,
    submission_id: i64,
    actor_id: i64,
    reason: Option<&str>,
) -> Result<Submission, AppError> {
    set_flag(pool, submission_id, actor_id, true, reason).await
}

/// Clear the review flag on a pending submission.
pub async fn unflag_submission(
    pool: &SqlitePool,
    submission_id: i64,
    actor_id: i64,
) -> Result<Submission, AppError> {
    set_flag(pool, submission_id, actor_id, false, None).await
}

async fn set_flag(
    pool: &SqlitePool,
    submission_id: i64,
    actor_id: i64,
    flagged: bool,
    reason: Option<&str>,
) -> Result<Submission, AppError> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());

    let mut tx = pool.begin().await?;

    let current = submission::queries::find_by_id_in_tx(&mut tx, submission_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if current.status != SubmissionStatus::Pending {
        return Err(AppError::State(format!(
            "Cannot {} submission with status {}",
            if flagged { "flag" } else { "unflag" },
            current.status.as_str()
        )));
    }

    submission::queries::set_flag_in_tx(&mut tx, submission_id, flagged, reason).await?;

    let action = if flagged {
        AuditAction::Flagged {
            reason: reason.map(String::from),
        }
    } else {
        AuditAction::Unflagged
    };
    audit::log_in_tx(&mut tx, submission_id, Some(actor_id), &action).await?;
    tx.commit().await?;

    get_submission(pool, submission_id).await
}

/// Edit the content fields of a still-pending submission.
pub async fn edit_submission(
    pool: &SqlitePool,
    submission_id: i64,
    actor_id: i64,
    edit: &EditSubmission,
) -> Result<Submission, AppError> {
    let mut tx = pool.begin().await?;

    let current = submission::queries::find_by_id_in_tx(&mut tx, submission_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if current.status != SubmissionStatus::Pending {
        return Err(AppError::State(format!(
            "Cannot edit submission with status {}",
            current.status.as_str()
        )));
    }

    let title = non_empty(edit.title.as_ref()).unwrap_or_else(|| current.title.clone());
    let description =
        non_empty(edit.description.as_ref()).unwrap_or_else(|| current.description.clone());
    let budget_min = edit.budget_min.unwrap_or(current.budget_min);
    let budget_max = edit.budget_max.unwrap_or(current.budget_max);

    let mut errors = Vec::new();
    if let Some(msg) = validate::validate_length(&title, "Title", 1, TITLE_MAX) {
        errors.push(FieldError::new("title", msg));
    }
    if let Some(msg) =
        validate::validate_length(&description, "Description", DESCRIPTION_MIN, DESCRIPTION_MAX)
    {
        errors.push(FieldError::new("description", msg));
    }
    if let Some(msg) = validate::validate_budget_range(budget_min, budget_max) {
        errors.push(FieldError::new("budgetMin", msg));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let changed_fields: Vec<String> =
        override_diffs(&current, &title, &description, budget_min, budget_max)
            .into_iter()
            .map(|d| d.field)
            .collect();

    submission::queries::update_fields_in_tx(
        &mut tx,
        submission_id,
        &title,
        &description,
        budget_min,
        budget_max,
    )
    .await?;

    if !changed_fields.is_empty() {
        audit::log_in_tx(
            &mut tx,
            submission_id,
            Some(actor_id),
            &AuditAction::Edited { changed_fields },
        )
        .await?;
    }
    tx.commit().await?;

    get_submission(pool, submission_id).await
}

/// Aggregate moderation counters.
pub async fn get_submission_stats(pool: &SqlitePool) -> Result<SubmissionStats, AppError> {
    submission::queries::stats(pool, Utc::now()).await
}
