use std::sync::Arc;
use std::time::Duration;

use foodsnap_api::clock::SystemClock;
use foodsnap_api::config::{Config, RecognitionMode, StorageBackend};
use foodsnap_api::ledger::DailyLedger;
use foodsnap_api::recognition::{FoodRecognizer, HttpRecognizer, MockRecognizer};
use foodsnap_api::storage::{FileStore, KeyValueStore, MemoryStore, PgStore};
use foodsnap_api::{build_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "foodsnap_api=debug,tower_http=debug".into());
    let pretty = std::env::var("LOG_FORMAT")
        .map(|v| v == "pretty")
        .unwrap_or(false);
    if pretty {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init();
    }

    let config = Arc::new(Config::from_env()?);

    let store: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::File => {
            let files = FileStore::new(config.data_dir.clone());
            tracing::info!(dir = %files.dir().display(), "Using file storage");
            Arc::new(files)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; the ledger will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let pool = db::create_pool(url).await?;
            db::run_migrations(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
    };

    let recognizer: Arc<dyn FoodRecognizer> = match config.recognition_mode {
        RecognitionMode::Http => {
            let http = HttpRecognizer::new(
                &config.recognition_url,
                Duration::from_secs(config.recognition_timeout_secs),
            )?;
            tracing::info!(endpoint = http.endpoint(), "Using recognition service");
            Arc::new(http)
        }
        RecognitionMode::Mock => {
            tracing::warn!("Using mock food recognition");
            Arc::new(MockRecognizer)
        }
    };

    let ledger = DailyLedger::open(store, Arc::new(SystemClock)).await?;
    if ledger.onboarding_required() {
        tracing::info!("No profile stored yet; onboarding required");
    }

    let state = AppState::new(config.clone(), ledger, recognizer);
    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
