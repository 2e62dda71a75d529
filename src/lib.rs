use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod clock;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod recognition;
pub mod storage;

use config::Config;
use ledger::DailyLedger;
use recognition::FoodRecognizer;

/// One ledger session per process; requests take turns on it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ledger: Arc<Mutex<DailyLedger>>,
    pub recognizer: Arc<dyn FoodRecognizer>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        ledger: DailyLedger,
        recognizer: Arc<dyn FoodRecognizer>,
    ) -> Self {
        Self {
            config,
            ledger: Arc::new(Mutex::new(ledger)),
            recognizer,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let allowed_origins: Vec<HeaderValue> = state
        .config
        .allowed_origins()
        .into_iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let predict_routes = Router::new()
        .route("/api/predict", post(handlers::predict::predict))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/profile", get(handlers::profile::get_profile))
        .route("/api/profile", put(handlers::profile::save_profile))
        .route("/api/ledger", get(handlers::daily_logs::get_ledger))
        .route(
            "/api/ledger/entries",
            post(handlers::daily_logs::record_entry),
        )
        .merge(predict_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
