use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::{password, rate_limit};
use crate::errors::AppError;
use crate::handlers::{Limiters, client_ip, ok_json};
use crate::models::user;

#[derive(Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

/// POST /admin/login - username/password login for reviewers.
/// Rate-limited per client IP before any database access.
pub async fn login(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    session: Session,
    limiters: web::Data<Limiters>,
    body: web::Json<LoginBody>,
) -> Result<HttpResponse, AppError> {
    let ip = client_ip(&req);

    let decision = limiters.login.check(&ip);
    if !decision.allowed {
        return Err(AppError::RateLimited {
            retry_after: decision.retry_after.unwrap_or(60),
        });
    }

    let found = user::queries::find_by_username(&pool, &body.username).await?;
    let Some(u) = found else {
        limiters.login.record(&ip);
        rate_limit::record_login_attempt(&pool, &ip, false, None).await;
        return Err(AppError::Session("Invalid username or password".to_string()));
    };

    if !password::verify_password(&body.password, &u.password)? {
        limiters.login.record(&ip);
        rate_limit::record_login_attempt(&pool, &ip, false, Some(u.id)).await;
        return Err(AppError::Session("Invalid username or password".to_string()));
    }

    limiters.login.clear(&ip);
    rate_limit::record_login_attempt(&pool, &ip, true, Some(u.id)).await;

    let _ = session.insert("user_id", u.id);
    let _ = session.insert("username", &u.username);
    let _ = session.insert("is_admin", u.is_admin);

    Ok(ok_json(json!({
        "id": u.id,
        "username": u.username,
        "displayName": u.display_name,
    })))
}

/// POST /admin/logout
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(ok_json(json!({ "loggedOut": true })))
}
