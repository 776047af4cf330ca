use chrono::Duration;
use std::sync::Arc;
use tubely_api::auth::make_jwt;
use tubely_core::{VideoParams, VideoRecord};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// A signed-in user.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn new() -> Self {
        let user_id = Uuid::new_v4();
        let token = make_jwt(user_id, TEST_JWT_SECRET, Duration::hours(1)).expect("sign token");
        Self { user_id, token }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Insert a draft video owned by `user`.
pub async fn create_video(repo: &Arc<InMemoryVideoRepository>, user: &TestUser) -> VideoRecord {
    let video = VideoRecord::new(
        user.user_id,
        VideoParams {
            title: "Boot.dev beats".to_string(),
            description: "Lo-fi to code to".to_string(),
        },
    );
    repo.create_video(&video).await.expect("create video")
}
