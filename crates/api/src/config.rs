use crate::auth::jwt::JwtConfig;
use naturelog_storage::DEFAULT_MAX_UPLOAD_BYTES;

/// Which attachment storage backend to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Local filesystem under `storage_path`.
    Local,
    /// S3 bucket named by `s3_bucket`.
    S3,
}

/// Server configuration loaded from environment variables.
///
/// All fields except `JWT_SECRET` have sensible defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Attachment storage backend.
    pub storage_backend: StorageBackend,
    /// Base directory for the local storage backend.
    pub storage_path: String,
    /// Bucket for the S3 storage backend.
    pub s3_bucket: String,
    /// Upload size cap in bytes.
    pub max_upload_bytes: u64,
    /// Base URL of the reverse-geocoding service.
    pub geocode_url: String,
    /// Base URL of the weather service.
    pub weather_url: String,
    /// Timeout for enrichment lookups in seconds.
    pub enrich_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                            |
    /// | `PORT`                 | `3000`                               |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                 |
    /// | `STORAGE_BACKEND`      | `local`                              |
    /// | `STORAGE_PATH`         | `./storage`                          |
    /// | `S3_BUCKET`            | `naturelog-media`                    |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                           |
    /// | `GEOCODE_URL`          | `https://nominatim.openstreetmap.org`|
    /// | `WEATHER_URL`          | `https://api.open-meteo.com`         |
    /// | `ENRICH_TIMEOUT_SECS`  | `5`                                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let storage_backend = match std::env::var("STORAGE_BACKEND").as_deref() {
            Ok("s3") => StorageBackend::S3,
            Ok("local") | Err(_) => StorageBackend::Local,
            Ok(other) => panic!("Unknown STORAGE_BACKEND '{other}'. Must be 'local' or 's3'"),
        };

        let storage_path = std::env::var("STORAGE_PATH").unwrap_or_else(|_| "./storage".into());

        let s3_bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "naturelog-media".into());

        let max_upload_bytes: u64 = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid u64");

        let geocode_url = std::env::var("GEOCODE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".into());

        let weather_url =
            std::env::var("WEATHER_URL").unwrap_or_else(|_| "https://api.open-meteo.com".into());

        let enrich_timeout_secs: u64 = std::env::var("ENRICH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("ENRICH_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage_backend,
            storage_path,
            s3_bucket,
            max_upload_bytes,
            geocode_url,
            weather_url,
            enrich_timeout_secs,
            jwt,
        }
    }
}
