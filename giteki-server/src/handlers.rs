use actix_web::{http::header, middleware, web, HttpResponse};
use giteki::{GitekiError, Store};
use serde::Serialize;

use crate::AppState;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Configure all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .route("/equipments", web::get().to(list_equipments))
            .route(
                "/radio-access-technologies",
                web::get().to(list_radio_access_technologies),
            )
            .route(
                "/radio-access-technologies/{code}",
                web::get().to(get_radio_access_technology),
            ),
    );
}

/// Responses are never cached; the database changes after every load.
pub fn no_cache() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new().add((header::CACHE_CONTROL, "no-cache"))
}

// ── Helpers ─────────────────────────────────────────────────────────

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}

fn err_response(e: GitekiError) -> HttpResponse {
    log::error!("Internal error: {e}");
    internal_error()
}

fn with_store<T, F>(state: &AppState, f: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&Store) -> giteki::Result<T>,
{
    let store = match state.store.lock() {
        Ok(store) => store,
        Err(_) => {
            log::error!("Store lock poisoned");
            return internal_error();
        }
    };
    match f(&store) {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => err_response(e),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

async fn list_equipments(state: web::Data<AppState>) -> HttpResponse {
    with_store(&state, |store| store.list_all())
}

async fn list_radio_access_technologies(state: web::Data<AppState>) -> HttpResponse {
    with_store(&state, |store| store.list_radio_access_technologies())
}

async fn get_radio_access_technology(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let code = path.into_inner();
    let store = match state.store.lock() {
        Ok(store) => store,
        Err(_) => {
            log::error!("Store lock poisoned");
            return internal_error();
        }
    };
    match store.describe_equipment_type(&code) {
        Ok(Some(description)) => HttpResponse::Ok().json(serde_json::json!({
            "equipment_type": code,
            "description": description,
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Unknown equipment type: {code}")
        })),
        Err(e) => err_response(e),
    }
}
