//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in-process: records in `InMemoryVideoRepository`,
//! thumbnails in a temp assets dir, video bodies in `object_store`'s
//! `InMemory`, and a stub prober in place of ffprobe.

#![allow(dead_code)]

pub mod auth;
pub mod fakes;
pub mod fixtures;

use axum_test::TestServer;
use object_store::memory::InMemory;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::AppState;
use tubely_core::{
    BaseConfig, Config, IngestConfig, StorageBackend, StorageConfig, TubelyConfig,
};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{AspectRatioClassifier, AssetIdGenerator, OsRandomIds, StreamGeometry};
use tubely_storage::{AssetUrlBuilder, LocalStorage, S3Storage};

use fakes::{FailingUpdates, RecordingProber};

pub const PUBLIC_BASE_URL: &str = "http://localhost:8091";
pub const BUCKET: &str = "tubely-media";
pub const REGION: &str = "us-east-2";

pub const FULL_HD: StreamGeometry = StreamGeometry {
    width: 1920,
    height: 1080,
};
pub const VERTICAL_FULL_HD: StreamGeometry = StreamGeometry {
    width: 1080,
    height: 1920,
};

/// Knobs for one test app.
pub struct TestOptions {
    pub geometry: StreamGeometry,
    pub fail_updates: bool,
    pub ids: Arc<dyn AssetIdGenerator>,
    pub max_thumbnail_size_bytes: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            geometry: FULL_HD,
            fail_updates: false,
            ids: Arc::new(OsRandomIds),
            max_thumbnail_size_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Test application: server plus handles on every backing store.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<InMemoryVideoRepository>,
    pub object_store: Arc<InMemory>,
    pub prober: Arc<RecordingProber>,
    pub config: Config,
    pub assets_dir: TempDir,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn assets_path(&self) -> &Path {
        self.assets_dir.path()
    }

    /// Files directly under the assets root.
    pub fn asset_files(&self) -> Vec<PathBuf> {
        list_files(self.assets_dir.path())
    }

    /// Leftover request-scoped temp files.
    pub fn temp_files(&self) -> Vec<PathBuf> {
        list_files(self.upload_dir.path())
    }
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.is_file())
        .collect()
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("assets dir");
    let upload_dir = tempfile::tempdir().expect("upload dir");

    let config = Config::new(TubelyConfig {
        base: BaseConfig {
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            ..Default::default()
        },
        storage: StorageConfig {
            storage_backend: StorageBackend::S3,
            assets_root: assets_dir.path().to_path_buf(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
            s3_bucket: Some(BUCKET.to_string()),
            s3_region: Some(REGION.to_string()),
            ..Default::default()
        },
        ingest: IngestConfig {
            upload_temp_dir: Some(upload_dir.path().to_path_buf()),
            max_thumbnail_size_bytes: options.max_thumbnail_size_bytes,
            ..Default::default()
        },
    });

    let urls = AssetUrlBuilder::from_config(&config);
    let object_store = Arc::new(InMemory::new());
    let video_storage = S3Storage::with_store(object_store.clone(), urls.clone(), Duration::from_secs(5))
        .expect("s3 storage");
    let asset_storage = LocalStorage::new(config.assets_root(), urls)
        .await
        .expect("local storage");

    let videos = Arc::new(InMemoryVideoRepository::new());
    let repository: Arc<dyn VideoRepository> = if options.fail_updates {
        Arc::new(FailingUpdates::new(videos.clone()))
    } else {
        videos.clone()
    };

    let prober = Arc::new(RecordingProber::new(options.geometry));

    let state = Arc::new(AppState {
        config: config.clone(),
        videos: repository,
        video_storage: Arc::new(video_storage),
        asset_storage: Arc::new(asset_storage),
        ids: options.ids,
        classifier: AspectRatioClassifier::new(prober.clone()),
    });

    let app = routes::setup_routes(&config, state).expect("routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        object_store,
        prober,
        config,
        assets_dir,
        upload_dir,
    }
}
