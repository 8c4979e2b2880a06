use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::middleware::session_auth;
use crate::models::fish_species::FishSpeciesInput;
use crate::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Deserialize)]
pub struct ListQuery {
    search: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/fishpedia")
            .route("", web::get().to(list_species))
            .route("", web::post().to(create_species))
            .route("/{id}", web::get().to(get_species))
            .route("/{id}", web::put().to(update_species))
            .route("/{id}", web::delete().to(delete_species)),
    );
}

async fn list_species(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let total = match state.db.count_fish_species() {
        Ok(total) => total,
        Err(e) => {
            log::error!("Failed to count fish species: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            });
        }
    };

    match state.db.list_fish_species(query.search.as_deref(), limit, offset) {
        Ok(species) => HttpResponse::Ok().json(serde_json::json!({
            "species": species,
            "total": total,
            "limit": limit,
            "offset": offset,
        })),
        Err(e) => {
            log::error!("Failed to list fish species: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}

async fn get_species(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.db.get_fish_species(path.into_inner()) {
        Ok(Some(species)) => HttpResponse::Ok().json(species),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Fish species not found".to_string(),
        }),
        Err(e) => {
            log::error!("Failed to get fish species: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}

async fn create_species(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<FishSpeciesInput>,
) -> impl Responder {
    if let Err(resp) = session_auth::authenticate_admin(&state.db, &req) {
        return resp;
    }

    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Name is required".to_string(),
        });
    }

    match state.db.insert_fish_species(&body) {
        Ok(species) => HttpResponse::Created().json(species),
        Err(e) => {
            log::error!("Failed to create fish species: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}

async fn update_species(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<FishSpeciesInput>,
) -> impl Responder {
    if let Err(resp) = session_auth::authenticate_admin(&state.db, &req) {
        return resp;
    }

    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Name is required".to_string(),
        });
    }

    match state.db.update_fish_species(path.into_inner(), &body) {
        Ok(Some(species)) => HttpResponse::Ok().json(species),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Fish species not found".to_string(),
        }),
        Err(e) => {
            log::error!("Failed to update fish species: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}

async fn delete_species(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = session_auth::authenticate_admin(&state.db, &req) {
        return resp;
    }

    match state.db.delete_fish_species(path.into_inner()) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Fish species not found".to_string(),
        }),
        Err(e) => {
            log::error!("Failed to delete fish species: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}
