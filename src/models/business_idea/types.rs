use chrono::{DateTime, Utc};
use serde::Serialize;

/// A published, publicly listable business idea.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BusinessIdea {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub budget_min: i64,
    pub budget_max: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBusinessIdea {
    pub title: String,
    pub description: String,
    pub budget_min: i64,
    pub budget_max: i64,
    /// Set to the approval time when created via submission approval, which
    /// is intentional: the published idea's age starts at publication.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessIdeaPage {
    pub items: Vec<BusinessIdea>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}
