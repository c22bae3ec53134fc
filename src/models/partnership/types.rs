use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PartnerRole {
    Helper,
    Outlet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PartnershipStatus {
    Pending,
    Contacted,
    Accepted,
    Rejected,
}

/// A contact request against a published business idea. Lifecycle is
/// independent of the submission workflow; only the status is admin-mutable.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipRequest {
    pub id: i64,
    pub business_idea_id: i64,
    pub name: String,
    pub phone_number: String,
    pub role: PartnerRole,
    pub status: PartnershipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPartnershipRequest {
    pub name: String,
    pub phone_number: String,
    pub role: PartnerRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnershipPage {
    pub items: Vec<PartnershipRequest>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}
