use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::auth::session::require_admin;
use crate::auth::validate;
use crate::errors::{AppError, FieldError};
use crate::handlers::{created_json, ok_json};
use crate::models::business_idea;
use crate::models::partnership::{self, NewPartnershipRequest, PartnershipStatus};

/// POST /api/ideas/{id}/partnership-requests - public contact request.
pub async fn create(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<NewPartnershipRequest>,
) -> Result<HttpResponse, AppError> {
    let idea_id = path.into_inner();
    business_idea::queries::find_by_id(&pool, idea_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut errors = Vec::new();
    if let Some(msg) = validate::validate_length(&body.name, "Name", 1, 100) {
        errors.push(FieldError::new("name", msg));
    }
    if let Some(msg) = validate::validate_phone(&body.phone_number) {
        errors.push(FieldError::new("phoneNumber", msg));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let id = partnership::queries::create(&pool, idea_id, &body).await?;
    let request = partnership::queries::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(created_json(request))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<PartnershipStatus>,
    pub business_idea_id: Option<i64>,
}

/// GET /api/admin/partnership-requests
pub async fn list(
    pool: web::Data<SqlitePool>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let page = partnership::queries::find_paginated(
        &pool,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(20),
        query.status,
        query.business_idea_id,
    )
    .await?;
    Ok(ok_json(page))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: PartnershipStatus,
}

/// PATCH /api/admin/partnership-requests/{id} - status update only.
pub async fn update_status(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<StatusBody>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let id = path.into_inner();
    if !partnership::queries::update_status(&pool, id, body.status).await? {
        return Err(AppError::NotFound);
    }
    let request = partnership::queries::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ok_json(request))
}
