//! Append-only audit trail for submission moderation. Entries are written
//! inside the transaction that performs the corresponding state change and
//! are never mutated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::errors::AppError;

/// Action taken on a submission, with per-variant metadata. The enum is
/// closed: new actions require a schema CHECK update as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", content = "metadata")]
pub enum AuditAction {
    #[serde(rename = "CREATED")]
    Created { spam_confidence: f64, flagged: bool },
    #[serde(rename = "EDITED")]
    Edited { changed_fields: Vec<String> },
    #[serde(rename = "APPROVED")]
    Approved {
        business_idea_id: i64,
        /// Field names substituted by reviewer overrides, with old/new values.
        overrides: Vec<OverrideDiff>,
    },
    #[serde(rename = "REJECTED")]
    Rejected { reason: Option<String> },
    #[serde(rename = "FLAGGED")]
    Flagged { reason: Option<String> },
    #[serde(rename = "UNFLAGGED")]
    Unflagged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideDiff {
    pub field: String,
    pub old: String,
    pub new: String,
}

impl AuditAction {
    pub fn name(&self) -> &'static str {
        match self {
            AuditAction::Created { .. } => "CREATED",
            AuditAction::Edited { .. } => "EDITED",
            AuditAction::Approved { .. } => "APPROVED",
            AuditAction::Rejected { .. } => "REJECTED",
            AuditAction::Flagged { .. } => "FLAGGED",
            AuditAction::Unflagged => "UNFLAGGED",
        }
    }

    fn metadata_json(&self) -> String {
        // The tagged representation carries "metadata" only for variants with
        // payloads; store just that part, defaulting to an empty object.
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map
                .get("metadata")
                .map(|m| m.to_string())
                .unwrap_or_else(|| "{}".to_string()),
            _ => "{}".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub submission_id: i64,
    pub action: String,
    pub actor_id: Option<i64>,
    pub metadata: String,
    pub created_at: DateTime<Utc>,
}

/// Append an audit entry inside an open transaction. `actor_id` is `None`
/// for system actions (anonymous creation, cleanup).
pub async fn log_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    submission_id: i64,
    actor_id: Option<i64>,
    action: &AuditAction,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO submission_audit_log (submission_id, action, actor_id, metadata)
         VALUES (?, ?, ?, ?)",
    )
    .bind(submission_id)
    .bind(action.name())
    .bind(actor_id)
    .bind(action.metadata_json())
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Full trail for one submission, oldest first.
pub async fn find_for_submission(
    pool: &SqlitePool,
    submission_id: i64,
) -> Result<Vec<AuditEntry>, AppError> {
    let entries = sqlx::query_as::<_, AuditEntry>(
        "SELECT id, submission_id, action, actor_id, metadata, created_at
         FROM submission_audit_log
         WHERE submission_id = ?
         ORDER BY id ASC",
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// The N most recent entries across all submissions (admin activity feed).
pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
    let entries = sqlx::query_as::<_, AuditEntry>(
        "SELECT id, submission_id, action, actor_id, metadata, created_at
         FROM submission_audit_log
         ORDER BY id DESC
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}
