use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of an anonymous submission. PENDING is the sole initial
/// state; APPROVED and REJECTED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Approved => "APPROVED",
            SubmissionStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }
}

/// An anonymously proposed business idea awaiting (or past) review.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub budget_min: i64,
    pub budget_max: i64,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(skip_serializing)]
    pub submitter_ip: String,
    pub status: SubmissionStatus,
    pub rejection_reason: Option<String>,
    pub flagged_for_review: bool,
    pub flag_reason: Option<String>,
    pub approved_by_id: Option<i64>,
    pub rejected_by_id: Option<i64>,
    pub business_idea_id: Option<i64>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn has_contact(&self) -> bool {
        self.contact_email.is_some() || self.contact_phone.is_some()
    }
}

/// Validated input for creating a submission. Built by the moderation
/// service after field validation and spam scoring.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub title: String,
    pub description: String,
    pub budget_min: i64,
    pub budget_max: i64,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub submitter_ip: String,
    pub flagged_for_review: bool,
    pub flag_reason: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Filters for the pending-review listing. All provided filters combine
/// with logical AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub has_contact: Option<bool>,
    pub flagged: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPage {
    pub items: Vec<Submission>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

/// Aggregate moderation counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub approved_last_30_days: i64,
    pub rejected_last_30_days: i64,
    pub flagged_count: i64,
    pub average_review_time_hours: f64,
}
