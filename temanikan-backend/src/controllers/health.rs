use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
    /// "gemini" when API keys are configured, "offline" when every answer
    /// comes from the local synthesizer.
    ai_mode: &'static str,
    species_count: i64,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let ai_mode = if state.config.api_keys.is_empty() {
        "offline"
    } else {
        "gemini"
    };

    match state.db.count_fish_species() {
        Ok(count) => HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            version: VERSION,
            database: "ok",
            ai_mode,
            species_count: count,
        }),
        Err(e) => {
            log::error!("Health check database probe failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "degraded",
                version: VERSION,
                database: "error",
                ai_mode,
                species_count: 0,
            })
        }
    }
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}
