use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::attachments::AttachmentError;
use crate::cv::edit::EditError;
use crate::cv::repository::RepositoryError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Step validation refusals are not errors; handlers return them as data.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid edit: {0}")]
    Edit(#[from] EditError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Attachment error: {0}")]
    Attachment(#[from] AttachmentError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Edit(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_EDIT",
                e.to_string(),
            ),
            AppError::Repository(e) => {
                tracing::error!("Repository error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "Your CV could not be saved. Please try again.".to_string(),
                )
            }
            AppError::Attachment(e) => {
                tracing::error!("Attachment error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORAGE_ERROR",
                    "The document could not be uploaded. Please try again.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("cv".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Edit(EditError::IndexOutOfRange {
                    section: "publications",
                    index: 3,
                    len: 1,
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Repository(RepositoryError::InvalidStep(0)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Attachment(AttachmentError::Upload("timeout".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
