use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use naturelog_api::config::{ServerConfig, StorageBackend};
use naturelog_api::router::build_app_router;
use naturelog_api::state::AppState;
use naturelog_enrich::{EnrichmentProvider, HttpEnricher, HttpEnricherConfig};
use naturelog_storage::{AttachmentStore, LocalStore, S3Store};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "naturelog_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = naturelog_db::create_pool(&database_url, 10)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    naturelog_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    naturelog_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Attachment storage ---
    let store: Arc<dyn AttachmentStore> = match config.storage_backend {
        StorageBackend::Local => {
            tracing::info!(path = %config.storage_path, "Using local attachment storage");
            Arc::new(LocalStore::new(&config.storage_path, config.max_upload_bytes))
        }
        StorageBackend::S3 => {
            tracing::info!(bucket = %config.s3_bucket, "Using S3 attachment storage");
            Arc::new(S3Store::from_env(config.s3_bucket.clone(), config.max_upload_bytes).await)
        }
    };

    // --- Enrichment provider ---
    let enricher: Arc<dyn EnrichmentProvider> = Arc::new(
        HttpEnricher::new(HttpEnricherConfig {
            geocode_url: config.geocode_url.clone(),
            weather_url: config.weather_url.clone(),
            timeout_secs: config.enrich_timeout_secs,
            user_agent: format!("naturelog/{}", env!("CARGO_PKG_VERSION")),
        })
        .expect("Failed to build enrichment HTTP client"),
    );

    // --- App state and router ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT combination");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store,
        enricher,
    };

    let app = build_app_router(state, &config);

    // --- Serve ---
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "NatureLog API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shut down cleanly");
}

/// Resolve on SIGINT or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
