use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::handlers::ok_json;
use crate::models::business_idea;
use crate::models::image::{self, ImageWithVariants};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/ideas - public listing of published ideas.
pub async fn list(
    pool: web::Data<SqlitePool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = business_idea::queries::find_paginated(
        &pool,
        query.page.unwrap_or(1),
        query.limit.unwrap_or(20),
    )
    .await?;
    Ok(ok_json(page))
}

/// GET /api/ideas/{id} - one idea with its images and variants.
pub async fn detail(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let idea = business_idea::queries::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut images = Vec::new();
    for img in image::queries::find_for_idea(&pool, id).await? {
        let variants = image::queries::find_variants(&pool, img.id).await?;
        images.push(ImageWithVariants {
            image: img,
            variants,
        });
    }

    Ok(ok_json(json!({ "idea": idea, "images": images })))
}
