use actix_web::{middleware, web, App, HttpServer};
use giteki::Store;
use std::path::Path;
use std::sync::Mutex;

mod handlers;

/// Shared application state
pub struct AppState {
    pub store: Mutex<Store>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("Starting giteki server");

    let db_path = std::env::var("GITEKI_DB").unwrap_or_else(|_| "giteki.db".to_string());
    let host = std::env::var("GITEKI_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("GITEKI_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    log::info!("Opening store at: {db_path}");
    let store = Store::open(Path::new(&db_path))
        .map_err(|e| std::io::Error::other(format!("Failed to open {db_path}: {e}")))?;

    let state = web::Data::new(AppState {
        store: Mutex::new(store),
    });

    log::info!("Listening on {host}:{port}");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .wrap(handlers::no_cache())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
