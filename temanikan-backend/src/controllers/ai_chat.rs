//! AI chat endpoint
//!
//! Receives a user question (with optional image), asks the orchestrator
//! for an answer, persists the exchange, and returns it. Whether the answer
//! came from the Gemini API or the offline synthesizer is invisible here:
//! the user always gets a response, never an AI error.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::ai::ImageData;
use crate::middleware::session_auth;
use crate::AppState;

/// Knowledge records pulled fresh per request to ground the answer.
const SNAPSHOT_LIMIT: i64 = 50;

const DEFAULT_HISTORY_LIMIT: i64 = 50;

#[derive(Deserialize)]
pub struct ChatRequest {
    message: Option<String>,
    /// Base64 payload, with or without a `data:<mime>;base64,` prefix.
    image: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    response: String,
    chat_id: i64,
    created_at: String,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/ai")
            .route("/chat", web::post().to(chat))
            .route("/chat/history", web::get().to(history))
            .route("/chat/history/{id}", web::delete().to(delete_exchange)),
    );
}

/// Split an optional data-URL prefix off the payload and check the rest is
/// valid base64.
fn parse_image(raw: &str) -> Result<ImageData, String> {
    let (mime_type, data) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (mime, payload) = rest
                .split_once(";base64,")
                .ok_or_else(|| "Invalid image data URL".to_string())?;
            (mime.to_string(), payload)
        }
        None => ("image/jpeg".to_string(), raw),
    };

    let data = data.trim();
    if data.is_empty() || BASE64.decode(data).is_err() {
        return Err("Image must be valid base64".to_string());
    }

    Ok(ImageData {
        mime_type,
        data: data.to_string(),
    })
}

async fn chat(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ChatRequest>,
) -> impl Responder {
    let user = match session_auth::authenticate(&state.db, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let message = match body.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Message is required".to_string(),
            });
        }
    };

    let image = match body.image.as_deref().filter(|i| !i.trim().is_empty()) {
        Some(raw) => match parse_image(raw) {
            Ok(img) => Some(img),
            Err(e) => {
                return HttpResponse::BadRequest().json(ErrorResponse { error: e });
            }
        },
        None => None,
    };

    // A failed snapshot read only costs answer grounding, not the answer.
    let records = match state.db.list_fish_species_snapshot(SNAPSHOT_LIMIT) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Failed to read fish species snapshot: {}", e);
            Vec::new()
        }
    };

    let answer = state
        .orchestrator
        .answer(&message, image.as_ref(), &records, &state.config.api_keys)
        .await;

    let exchange = match state.db.insert_chat_exchange(
        user.id,
        &message,
        &answer,
        image.is_some(),
        None,
    ) {
        Ok(exchange) => exchange,
        Err(e) => {
            log::error!("Failed to store chat exchange: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to store chat".to_string(),
            });
        }
    };

    HttpResponse::Ok().json(ChatResponse {
        response: exchange.response,
        chat_id: exchange.id,
        created_at: exchange.created_at.to_rfc3339(),
    })
}

async fn history(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    let user = match session_auth::authenticate(&state.db, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 200);
    match state.db.list_chat_history(user.id, limit) {
        Ok(history) => HttpResponse::Ok().json(serde_json::json!({ "history": history })),
        Err(e) => {
            log::error!("Failed to list chat history: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}

async fn delete_exchange(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user = match session_auth::authenticate(&state.db, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match state.db.delete_chat_exchange(user.id, path.into_inner()) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Chat not found".to_string(),
        }),
        Err(e) => {
            log::error!("Failed to delete chat exchange: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ApiKeyPool, ChatOrchestrator, GeminiClient};
    use crate::config::Config;
    use crate::db::Database;
    use actix_web::{test, App};
    use std::sync::Arc;

    fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::new(dir.path().join("test.db").to_str().unwrap()).unwrap());
        // Empty key pool: the orchestrator goes straight to the offline
        // synthesizer, so no network is touched in these tests.
        let state = AppState {
            db,
            config: Config {
                port: 0,
                database_url: String::new(),
                api_keys: ApiKeyPool::from_values(None, None),
            },
            orchestrator: Arc::new(ChatOrchestrator::new(GeminiClient::new().unwrap())),
        };
        (dir, state)
    }

    fn login(state: &AppState) -> (i64, String) {
        let user = state.db.create_user("Budi", "budi@example.com", "pw1234").unwrap();
        let session = state.db.create_session_for_user(user.id).unwrap();
        (user.id, session.token)
    }

    #[actix_web::test]
    async fn chat_persists_exactly_one_exchange() {
        let (_dir, state) = test_state();
        let db = state.db.clone();
        let (user_id, token) = login(&state);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/ai/chat")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(serde_json::json!({ "message": "apa itu ikan koi" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert!(!body["response"].as_str().unwrap().is_empty());
        assert!(body["chat_id"].as_i64().unwrap() > 0);
        assert!(body["created_at"].as_str().is_some());

        assert_eq!(db.count_chat_history(user_id).unwrap(), 1);
        let stored = &db.list_chat_history(user_id, 10).unwrap()[0];
        assert_eq!(stored.message, "apa itu ikan koi");
        assert!(!stored.response.is_empty());
    }

    #[actix_web::test]
    async fn missing_message_is_rejected_without_persisting() {
        let (_dir, state) = test_state();
        let db = state.db.clone();
        let (user_id, token) = login(&state);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        for payload in [
            serde_json::json!({}),
            serde_json::json!({ "message": "" }),
            serde_json::json!({ "message": "   " }),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/ai/chat")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);
        }

        assert_eq!(db.count_chat_history(user_id).unwrap(), 0);
    }

    #[actix_web::test]
    async fn chat_requires_authentication() {
        let (_dir, state) = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/ai/chat")
            .set_json(serde_json::json!({ "message": "halo" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn invalid_image_payload_is_rejected() {
        let (_dir, state) = test_state();
        let (_user_id, token) = login(&state);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/ai/chat")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(serde_json::json!({
                "message": "ikan saya sakit",
                "image": "data:image/png;base64,not!!valid!!"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn history_lists_only_own_exchanges() {
        let (_dir, state) = test_state();
        let db = state.db.clone();
        let (user_id, token) = login(&state);

        let other = db.create_user("Siti", "siti@example.com", "pw1234").unwrap();
        db.insert_chat_exchange(user_id, "q1", "a1", false, None).unwrap();
        db.insert_chat_exchange(other.id, "q2", "a2", false, None).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/ai/chat/history")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let history = body["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["message"], "q1");
    }

    #[::core::prelude::v1::test]
    fn parse_image_handles_data_url_prefix() {
        let img = parse_image("data:image/png;base64,aGFsbw==").unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.data, "aGFsbw==");

        let img = parse_image("aGFsbw==").unwrap();
        assert_eq!(img.mime_type, "image/jpeg");

        assert!(parse_image("data:image/png;base64,???").is_err());
        assert!(parse_image("data:image/png,no-base64-marker").is_err());
        assert!(parse_image("").is_err());
    }
}
