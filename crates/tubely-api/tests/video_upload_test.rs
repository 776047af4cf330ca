//! Video upload integration tests.
//!
//! Run with: `cargo test -p tubely-api --test video_upload_test`

mod helpers;

use futures::TryStreamExt;
use helpers::auth::{create_video, TestUser};
use helpers::fakes::FixedIds;
use helpers::fixtures::{mp4_bytes, single_part, video_form};
use helpers::{
    setup_test_app, setup_test_app_with, TestApp, TestOptions, BUCKET, REGION, VERTICAL_FULL_HD,
};
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, ObjectStoreExt};
use std::collections::HashSet;
use std::sync::Arc;
use tubely_core::VideoRecord;
use tubely_db::VideoRepository;
use tubely_processing::StreamGeometry;
use uuid::Uuid;

fn path(video_id: Uuid) -> String {
    format!("/api/video_upload/{}", video_id)
}

fn object_url(key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", BUCKET, REGION, key)
}

async fn stored_keys(app: &TestApp) -> Vec<String> {
    app.object_store
        .list(None)
        .map_ok(|meta| meta.location.to_string())
        .try_collect()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_landscape_video_is_keyed_under_landscape() {
    let app = setup_test_app_with(TestOptions {
        ids: Arc::new(FixedIds("fixed-video-id")),
        ..Default::default()
    })
    .await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(mp4_bytes()))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: VideoRecord = response.json();
    assert_eq!(
        updated.video_url.as_deref(),
        Some(object_url("landscape/fixed-video-id.mp4").as_str())
    );
    assert_eq!(updated.params, video.params);

    let object = app
        .object_store
        .get(&ObjectPath::from("landscape/fixed-video-id.mp4"))
        .await
        .unwrap();
    assert_eq!(object.bytes().await.unwrap().as_ref(), mp4_bytes().as_slice());

    let stored = app.videos.get_video(video.id).await.unwrap();
    assert_eq!(stored.video_url, updated.video_url);
}

#[tokio::test]
async fn test_portrait_video_is_keyed_under_portrait() {
    let app = setup_test_app_with(TestOptions {
        geometry: VERTICAL_FULL_HD,
        ..Default::default()
    })
    .await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(mp4_bytes()))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: VideoRecord = response.json();
    let url = updated.video_url.unwrap();
    assert!(url.starts_with(&object_url("portrait/")));
    assert!(url.ends_with(".mp4"));
}

#[tokio::test]
async fn test_square_video_is_keyed_under_other() {
    let app = setup_test_app_with(TestOptions {
        geometry: StreamGeometry {
            width: 1000,
            height: 1000,
        },
        ..Default::default()
    })
    .await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(mp4_bytes()))
        .await;

    assert_eq!(response.status_code(), 200);
    let keys = stored_keys(&app).await;
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("other/"));
}

#[tokio::test]
async fn test_temp_file_is_probed_then_removed() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(mp4_bytes()))
        .await;
    assert_eq!(response.status_code(), 200);

    let probed = app.prober.probed();
    assert_eq!(probed.len(), 1);
    let (temp_path, existed) = &probed[0];
    assert!(existed);
    assert!(temp_path.starts_with(app.upload_dir.path()));
    assert!(!temp_path.exists());
    assert!(app.temp_files().is_empty());
}

#[tokio::test]
async fn test_zero_height_is_dependency_error_and_cleans_up() {
    let app = setup_test_app_with(TestOptions {
        geometry: StreamGeometry {
            width: 1920,
            height: 0,
        },
        ..Default::default()
    })
    .await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(mp4_bytes()))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(stored_keys(&app).await.is_empty());
    assert!(app.temp_files().is_empty());
    assert_eq!(app.videos.get_video(video.id).await.unwrap(), video);
}

#[tokio::test]
async fn test_wrong_content_type_rejected_before_buffering() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", user.bearer())
        .multipart(single_part("video", mp4_bytes(), "clip.mov", "video/quicktime"))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.prober.probed().is_empty());
    assert!(app.temp_files().is_empty());
    assert!(stored_keys(&app).await.is_empty());
}

#[tokio::test]
async fn test_empty_video_rejected() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(Vec::new()))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.temp_files().is_empty());
}

#[tokio::test]
async fn test_non_owner_rejected_before_any_write() {
    let app = setup_test_app().await;
    let owner = TestUser::new();
    let intruder = TestUser::new();
    let video = create_video(&app.videos, &owner).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", intruder.bearer())
        .multipart(video_form(mp4_bytes()))
        .await;

    assert_eq!(response.status_code(), 401);
    assert!(stored_keys(&app).await.is_empty());
    assert!(app.temp_files().is_empty());
    assert_eq!(app.videos.get_video(video.id).await.unwrap(), video);
}

#[tokio::test]
async fn test_failed_update_deletes_stored_object() {
    let app = setup_test_app_with(TestOptions {
        fail_updates: true,
        ..Default::default()
    })
    .await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let response = app
        .client()
        .post(&path(video.id))
        .add_header("Authorization", user.bearer())
        .multipart(video_form(mp4_bytes()))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert!(stored_keys(&app).await.is_empty());
    assert!(app.temp_files().is_empty());
    assert_eq!(app.videos.get_video(video.id).await.unwrap(), video);
}

#[tokio::test]
async fn test_identical_uploads_get_distinct_keys() {
    let app = setup_test_app().await;
    let user = TestUser::new();
    let video = create_video(&app.videos, &user).await;

    let mut urls = HashSet::new();
    for _ in 0..5 {
        let response = app
            .client()
            .post(&path(video.id))
            .add_header("Authorization", user.bearer())
            .multipart(video_form(mp4_bytes()))
            .await;
        assert_eq!(response.status_code(), 200);
        let updated: VideoRecord = response.json();
        urls.insert(updated.video_url.unwrap());
    }

    assert_eq!(urls.len(), 5);
    assert_eq!(stored_keys(&app).await.len(), 5);
}

#[tokio::test]
async fn test_healthz() {
    let app = setup_test_app().await;
    let response = app.client().get("/api/healthz").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "OK");
}
