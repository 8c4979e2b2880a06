// Session authentication helpers for protected routes.

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::db::Database;
use crate::models::User;

pub fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim_start_matches("Bearer ").to_string())
}

/// Resolve the request's bearer token to a user, or produce the error
/// response the controller should return as-is.
pub fn authenticate(db: &Arc<Database>, req: &HttpRequest) -> Result<User, HttpResponse> {
    let token = extract_token(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "No authorization token provided"
        }))
    })?;

    match db.validate_session(&token) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid or expired session"
        }))),
        Err(e) => {
            log::error!("Session validation error: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })))
        }
    }
}

/// Same as `authenticate`, but additionally requires the admin role.
pub fn authenticate_admin(db: &Arc<Database>, req: &HttpRequest) -> Result<User, HttpResponse> {
    let user = authenticate(db, req)?;
    if !user.is_admin() {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin access required"
        })));
    }
    Ok(user)
}
