use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::middleware::session_auth;
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct UserInfo {
    id: i64,
    name: String,
    email: String,
    role: String,
}

impl AuthResponse {
    fn error(msg: &str) -> Self {
        Self {
            success: false,
            token: None,
            expires_at: None,
            user: None,
            error: Some(msg.to_string()),
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

fn user_info(user: &crate::models::User) -> UserInfo {
    UserInfo {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
    }
}

async fn register(state: web::Data<AppState>, body: web::Json<RegisterRequest>) -> impl Responder {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || body.password.len() < 6 {
        return HttpResponse::BadRequest().json(AuthResponse::error(
            "Name, email, and a password of at least 6 characters are required",
        ));
    }

    match state.db.get_user_by_email(&email) {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(AuthResponse::error("Email already registered"));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up user: {}", e);
            return HttpResponse::InternalServerError().json(AuthResponse::error("Database error"));
        }
    }

    let user = match state.db.create_user(name, &email, &body.password) {
        Ok(user) => user,
        Err(e) => {
            log::error!("Failed to create user: {}", e);
            return HttpResponse::InternalServerError().json(AuthResponse::error("Database error"));
        }
    };

    match state.db.create_session_for_user(user.id) {
        Ok(session) => HttpResponse::Ok().json(AuthResponse {
            success: true,
            token: Some(session.token),
            expires_at: Some(session.expires_at.timestamp()),
            user: Some(user_info(&user)),
            error: None,
        }),
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            HttpResponse::InternalServerError().json(AuthResponse::error("Failed to create session"))
        }
    }
}

async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    let email = body.email.trim().to_lowercase();

    let user = match state.db.get_user_by_email(&email) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized()
                .json(AuthResponse::error("Invalid email or password"));
        }
        Err(e) => {
            log::error!("Failed to look up user: {}", e);
            return HttpResponse::InternalServerError().json(AuthResponse::error("Database error"));
        }
    };

    if !crate::db::Database::verify_password(&user, &body.password) {
        return HttpResponse::Unauthorized().json(AuthResponse::error("Invalid email or password"));
    }

    match state.db.create_session_for_user(user.id) {
        Ok(session) => HttpResponse::Ok().json(AuthResponse {
            success: true,
            token: Some(session.token),
            expires_at: Some(session.expires_at.timestamp()),
            user: Some(user_info(&user)),
            error: None,
        }),
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            HttpResponse::InternalServerError().json(AuthResponse::error("Failed to create session"))
        }
    }
}

async fn logout(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let Some(token) = session_auth::extract_token(&req) else {
        return HttpResponse::Ok().json(serde_json::json!({ "success": true }));
    };

    match state.db.delete_session(&token) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => {
            log::error!("Failed to delete session: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "success": false }))
        }
    }
}

async fn me(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    match session_auth::authenticate(&state.db, &req) {
        Ok(user) => HttpResponse::Ok().json(user_info(&user)),
        Err(resp) => resp,
    }
}
