//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Any `AppError`
//! (or a type convertible into one) becomes an `HttpAppError` through `?` and
//! renders with the status, body and log level its `ErrorMetadata` describes.
//! In production, [`redact_error_details`] strips the diagnostic fields from
//! those bodies on the way out.

use axum::{
    extract::{multipart::MultipartError, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::{AppError, Config, ErrorMetadata, LogLevel};
use tubely_storage::StorageError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: both the trait and `AppError` are foreign to this crate).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

/// Multipart read failures. A body cut off by the size limit is a 413;
/// anything else is a malformed request.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Couldn't parse multipart form: {}", err.body_text()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let hide_details = app_error.is_sensitive();
        let body = ErrorResponse {
            error: app_error.client_message(),
            details: (!hide_details).then(|| app_error.detailed_message()),
            error_type: (!hide_details).then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
        };

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Re-render error bodies without `details` and `error_type` when the app
/// runs in production. Other responses pass through untouched.
pub async fn redact_error_details(
    State(config): State<Config>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !config.is_production() {
        return response;
    }

    match response.extensions().get::<ErrorResponse>() {
        Some(body) if body.details.is_some() || body.error_type.is_some() => {
            let redacted = ErrorResponse {
                details: None,
                error_type: None,
                ..body.clone()
            };
            (response.status(), Json(redacted)).into_response()
        }
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use axum_test::TestServer;
    use tubely_core::{BaseConfig, TubelyConfig};
    use uuid::Uuid;

    fn config(environment: &str) -> Config {
        Config::new(TubelyConfig {
            base: BaseConfig {
                environment: environment.to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn failing_app(config: Config) -> TestServer {
        let app = Router::new()
            .route(
                "/fail",
                get(|| async {
                    Err::<(), _>(HttpAppError(AppError::UnsupportedMediaType(
                        "image/gif".to_string(),
                    )))
                }),
            )
            .route("/ok", get(|| async { "OK" }))
            .layer(middleware::from_fn_with_state(config, redact_error_details));
        TestServer::new(app.into_make_service()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_from_storage_error_is_dependency_failure() {
        let HttpAppError(app_err) = StorageError::UploadFailed("reset".to_string()).into();
        assert!(matches!(app_err, AppError::Storage(_)));
        assert_eq!(app_err.http_status_code(), 500);
    }

    #[tokio::test]
    async fn test_client_error_includes_details() {
        let response =
            HttpAppError(AppError::UnsupportedMediaType("image/gif".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "UNSUPPORTED_MEDIA_TYPE");
        assert_eq!(json["recoverable"], false);
        assert_eq!(json["error_type"], "UnsupportedMediaType");
        assert!(json["details"].as_str().unwrap().contains("image/gif"));
    }

    #[tokio::test]
    async fn test_dependency_error_hides_details() {
        let response =
            HttpAppError(AppError::Storage("bucket tubely-media: 503".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Couldn't store file");
        assert!(json.get("details").is_none());
        assert!(json.get("error_type").is_none());
    }

    #[tokio::test]
    async fn test_not_owner_is_unauthorized() {
        let response = HttpAppError(AppError::NotOwner {
            user_id: Uuid::new_v4(),
            video_id: Uuid::new_v4(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "NOT_VIDEO_OWNER");
    }

    /// Serialized ErrorResponse always has "error", "code" and "recoverable".
    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "Couldn't find video".to_string(),
            details: None,
            error_type: None,
            code: "NOT_FOUND".to_string(),
            recoverable: false,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json["recoverable"].is_boolean());
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_production_config_redacts_details() {
        let server = failing_app(config("production"));

        let response = server.get("/fail").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "UNSUPPORTED_MEDIA_TYPE");
        assert!(json["error"].is_string());
        assert!(json.get("details").is_none());
        assert!(json.get("error_type").is_none());

        server.get("/ok").await.assert_text("OK");
    }

    #[tokio::test]
    async fn test_development_config_keeps_details() {
        let server = failing_app(config("development"));

        let json = server.get("/fail").await.json::<serde_json::Value>();
        assert_eq!(json["error_type"], "UnsupportedMediaType");
        assert!(json["details"].as_str().unwrap().contains("image/gif"));
    }
}
