pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::attachments::handlers::{self as attachments, UPLOAD_BODY_LIMIT};
use crate::cv::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV wizard
        .route("/api/v1/cv/save", post(handlers::handle_save))
        .route("/api/v1/cv/save-progress", post(handlers::handle_save_progress))
        .route("/api/v1/cv/edit", post(handlers::handle_edit))
        .route("/api/v1/cv/navigate", post(handlers::handle_navigate))
        .route("/api/v1/cv/validate-step", post(handlers::handle_validate_step))
        .route("/api/v1/cv/validate-field", post(handlers::handle_validate_field))
        .route("/api/v1/cv/:user_id", get(handlers::handle_get_cv))
        .route("/api/v1/cv/:user_id/export", get(handlers::handle_export))
        // Attachments
        .route(
            "/api/v1/documents/upload-document",
            post(attachments::handle_upload_document).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::testing::test_context;

    #[tokio::test]
    async fn test_health() {
        let resp = build_router(test_context().state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["service"], "cv-api");
    }

    #[tokio::test]
    async fn test_invalid_user_id_is_rejected() {
        let resp = build_router(test_context().state)
            .oneshot(Request::get("/api/v1/cv/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
