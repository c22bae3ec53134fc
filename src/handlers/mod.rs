pub mod auth_handlers;
pub mod idea_handlers;
pub mod partnership_handlers;
pub mod review_handlers;
pub mod submission_handlers;
pub mod upload_handlers;

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::auth::rate_limit::RateLimiter;
use crate::media::{ImageProcessor, store::MediaStore};

/// Per-endpoint rate limiters, injected as one piece of app data.
#[derive(Clone)]
pub struct Limiters {
    pub login: RateLimiter,
    pub submit: RateLimiter,
    pub upload: RateLimiter,
}

/// Upload pipeline dependencies.
#[derive(Clone)]
pub struct MediaState {
    pub store: MediaStore,
    pub processor: Arc<dyn ImageProcessor>,
}

/// 200 with the success envelope.
pub fn ok_json<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": data }))
}

/// 201 with the success envelope.
pub fn created_json<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(json!({ "success": true, "data": data }))
}

/// Client address for rate limiting; unspecified when the socket has none.
pub fn client_ip(req: &actix_web::HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "0.0.0.0".to_string())
}
