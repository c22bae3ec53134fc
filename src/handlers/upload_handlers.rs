use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::errors::AppError;
use crate::handlers::{Limiters, MediaState, client_ip, created_json};
use crate::media;

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

/// POST /api/upload - raw image body, IP rate-limited. Returns the image id
/// and its variant paths.
pub async fn upload(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    media_state: web::Data<MediaState>,
    limiters: web::Data<Limiters>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let ip = client_ip(&req);

    let decision = limiters.upload.check(&ip);
    if !decision.allowed {
        return Err(AppError::RateLimited {
            retry_after: decision.retry_after.unwrap_or(60),
        });
    }
    limiters.upload.record(&ip);

    let filename = query
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or("upload");

    let stored = media::process_upload(
        &pool,
        &media_state.store,
        media_state.processor.as_ref(),
        &body,
        filename,
        config.max_upload_bytes,
    )
    .await?;

    Ok(created_json(stored))
}
