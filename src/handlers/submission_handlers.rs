use actix_web::{HttpRequest, HttpResponse, web};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::handlers::{Limiters, client_ip, created_json};
use crate::moderation::{self, CreateSubmission};

/// POST /api/submissions/anonymous - public submission intake.
/// Gated by the per-IP submission limiter; every attempt (accepted or not)
/// counts against the window.
pub async fn create_anonymous(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    limiters: web::Data<Limiters>,
    body: web::Json<CreateSubmission>,
) -> Result<HttpResponse, AppError> {
    let ip = client_ip(&req);

    let decision = limiters.submit.check(&ip);
    if !decision.allowed {
        return Err(AppError::RateLimited {
            retry_after: decision.retry_after.unwrap_or(60),
        });
    }
    limiters.submit.record(&ip);

    let submission = moderation::create_submission(&pool, &body, &ip).await?;
    Ok(created_json(submission))
}
