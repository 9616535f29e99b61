use std::sync::Arc;

use sqlx::PgPool;

use naturelog_enrich::EnrichmentProvider;
use naturelog_storage::AttachmentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Attachment storage backend.
    pub store: Arc<dyn AttachmentStore>,
    /// Location/weather enrichment provider.
    pub enricher: Arc<dyn EnrichmentProvider>,
}
