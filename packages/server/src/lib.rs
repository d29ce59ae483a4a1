#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the safepath report map.
//!
//! Serves the REST API the map frontend talks to: report submission and
//! listing, nearby lookups, and the stats tab counters. Everything is
//! backed by the shared in-memory [`ReportStore`]; nothing survives a
//! restart, which is all the product needs today.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use safepath_report::{ReportStore, seed};

/// Shared application state.
pub struct AppState {
    /// The in-memory report collection, shared across workers.
    pub store: Arc<ReportStore>,
}

/// Starts the safepath API server.
///
/// Builds the in-memory store (seeding the demo dataset when
/// `SAFEPATH_SEED_DEMO` is set) and starts the Actix-Web HTTP server on
/// `BIND_ADDR`:`PORT`. This is a regular async function; the caller
/// provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let store = Arc::new(ReportStore::new());

    if std::env::var("SAFEPATH_SEED_DEMO").is_ok() {
        match seed::seed_demo_reports(&store, chrono::Utc::now()) {
            Ok(count) => log::info!("Seeded {count} demo reports"),
            Err(e) => log::warn!("Demo seed failed: {e}"),
        }
    }

    let state = web::Data::new(AppState {
        store: Arc::clone(&store),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(api_scope())
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// The `/api` routes, split out so tests can mount them on a bare app.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health))
        .route("/types", web::get().to(handlers::types))
        .route("/report", web::post().to(handlers::submit_report))
        .route("/reports", web::get().to(handlers::reports))
        .route("/nearby", web::get().to(handlers::nearby))
        .route("/stats/total", web::get().to(handlers::stats_total))
        .route("/stats/last7", web::get().to(handlers::stats_last7))
        .route(
            "/stats/most-common",
            web::get().to(handlers::stats_most_common),
        )
}
