use actix_session::Session;

use crate::errors::AppError;

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Option<String> {
    session.get::<String>("username").unwrap_or(None)
}

/// Resolve the logged-in admin's user id, or fail with an auth error.
pub fn require_admin(session: &Session) -> Result<i64, AppError> {
    let user_id = get_user_id(session).ok_or(AppError::AuthRequired)?;
    let is_admin = session.get::<bool>("is_admin").unwrap_or(None).unwrap_or(false);
    if !is_admin {
        return Err(AppError::Session("Admin privileges required".to_string()));
    }
    Ok(user_id)
}
