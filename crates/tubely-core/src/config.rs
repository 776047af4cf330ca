//! Configuration module
//!
//! Configuration is read once from the environment (after loading `.env`) and
//! then handed to every component explicitly. Nothing here is global.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 5;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 1024;
const PROBE_TIMEOUT_SECS: u64 = 30;
const STORAGE_TIMEOUT_SECS: u64 = 300;
const MIN_JWT_SECRET_LEN: usize = 32;
const HTTP_CONCURRENCY_LIMIT: usize = 1_000;

/// Console output format for tracing events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is compact.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Server, auth and database settings.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    /// When unset the API keeps video records in memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Requests served at once before new ones wait.
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            jwt_secret: String::new(),
            database_url: None,
            db_max_connections: MAX_CONNECTIONS,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            log_format: LogFormat::Compact,
        }
    }
}

/// Where assets are written and how their public URLs are formed.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Backend for video bodies. Thumbnails always use `assets_root`.
    pub storage_backend: StorageBackend,
    pub assets_root: PathBuf,
    /// Origin that serves `/assets`, e.g. `http://localhost:8091`.
    pub public_base_url: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub s3_endpoint: Option<String>,
    pub storage_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::S3,
            assets_root: PathBuf::from("./assets"),
            public_base_url: format!("http://localhost:{}", SERVER_PORT),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            storage_timeout_secs: STORAGE_TIMEOUT_SECS,
        }
    }
}

/// Upload limits and media probing.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub ffprobe_path: String,
    pub probe_timeout_secs: u64,
    /// Directory for request-scoped temp files; the OS temp dir when unset.
    pub upload_temp_dir: Option<PathBuf>,
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
            upload_temp_dir: None,
            max_thumbnail_size_bytes: MAX_THUMBNAIL_SIZE_MB * 1024 * 1024,
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TubelyConfig {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<TubelyConfig>);

impl Config {
    pub fn new(inner: TubelyConfig) -> Self {
        Config(Box::new(inner))
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = TubelyConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.0.validate()
    }

    pub fn is_production(&self) -> bool {
        is_production(&self.0.base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.0.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.0.base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.base.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.0.base.jwt_secret
    }

    pub fn database_url(&self) -> Option<&str> {
        self.0.base.database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.0.base.db_max_connections
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.0.base.http_concurrency_limit
    }

    pub fn log_format(&self) -> LogFormat {
        self.0.base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.0.storage.storage_backend
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.0.storage.assets_root
    }

    pub fn public_base_url(&self) -> &str {
        &self.0.storage.public_base_url
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.0.storage.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.0.storage.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.0.storage.s3_endpoint.as_deref()
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.0.storage.storage_timeout_secs)
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.0.ingest.ffprobe_path
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.0.ingest.probe_timeout_secs)
    }

    pub fn upload_temp_dir(&self) -> Option<&PathBuf> {
        self.0.ingest.upload_temp_dir.as_ref()
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.0.ingest.max_thumbnail_size_bytes
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.0.ingest.max_video_size_bytes
    }
}

fn is_production(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl TubelyConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            environment,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: non_empty_var("DATABASE_URL"),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: non_empty_var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        };

        let storage = StorageConfig {
            storage_backend: non_empty_var("STORAGE_BACKEND")
                .map(|s| s.parse::<StorageBackend>())
                .transpose()?
                .unwrap_or(StorageBackend::S3),
            assets_root: PathBuf::from(
                env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string()),
            ),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
            s3_bucket: non_empty_var("S3_BUCKET"),
            s3_region: non_empty_var("S3_REGION").or_else(|| non_empty_var("AWS_REGION")),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            storage_timeout_secs: env::var("STORAGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| STORAGE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(STORAGE_TIMEOUT_SECS),
        };

        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);
        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let ingest = IngestConfig {
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            probe_timeout_secs: env::var("PROBE_TIMEOUT_SECS")
                .unwrap_or_else(|_| PROBE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(PROBE_TIMEOUT_SECS),
            upload_temp_dir: non_empty_var("UPLOAD_TEMP_DIR").map(PathBuf::from),
            max_thumbnail_size_bytes: max_thumbnail_size_mb * 1024 * 1024,
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
        };

        let config = TubelyConfig {
            base,
            storage,
            ingest,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if let Some(url) = &self.base.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.storage.storage_backend == StorageBackend::S3 {
            if self.storage.s3_bucket.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_BUCKET must be set when using S3 storage backend"
                ));
            }
            if self.storage.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                ));
            }
        }

        if self.ingest.probe_timeout_secs == 0 || self.storage.storage_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "PROBE_TIMEOUT_SECS and STORAGE_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.ingest.max_thumbnail_size_bytes == 0 || self.ingest.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        Ok(())
    }
}
