use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use serde_json::json;

/// Middleware guard for the admin scope: rejects requests without an
/// authenticated admin session with a 401 JSON envelope.
pub async fn require_admin_session(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();
    let is_admin = session.get::<bool>("is_admin").unwrap_or(None).unwrap_or(false);
    let has_user = session.get::<i64>("user_id").unwrap_or(None).is_some();

    if !has_user || !is_admin {
        let body = json!({
            "success": false,
            "error": { "code": "AUTH_REQUIRED", "message": "Authentication required" }
        });
        let response = HttpResponse::Unauthorized().json(body);
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// CSRF guard for JSON mutation endpoints: browsers cannot send cross-origin
/// JSON with cookies via a simple form POST, so requiring the JSON
/// content-type on mutations acts as CSRF protection without tokens.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PATCH
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Content-Type must be application/json for mutation requests"
                }
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
