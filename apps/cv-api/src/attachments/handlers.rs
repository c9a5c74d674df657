use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::attachments::NewUpload;
use crate::cv::field_validation::{validate_file, AttachmentCategory, FileMeta};
use crate::errors::AppError;
use crate::state::AppState;

/// Largest accepted request body: the biggest category limit plus room for
/// the multipart envelope.
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024 + 64 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub category: AttachmentCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

struct UploadedFile {
    file_name: String,
    content_type: String,
    body: Bytes,
}

/// POST /api/v1/documents/upload-document
///
/// Multipart fields: `userId`, `category`, `file`. A file that breaks the
/// category's size or type rule is a 200 with `success: false`.
pub async fn handle_upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut category: Option<AttachmentCategory> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "userId" => {
                let text = field.text().await.map_err(multipart_error)?;
                user_id = Some(
                    Uuid::parse_str(text.trim())
                        .map_err(|_| AppError::Validation("userId must be a UUID".to_string()))?,
                );
            }
            "category" => {
                let text = field.text().await.map_err(multipart_error)?;
                category = Some(text.trim().parse().map_err(AppError::Validation)?);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let body = field.bytes().await.map_err(multipart_error)?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    body,
                });
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| AppError::Validation("userId is required".to_string()))?;
    let category =
        category.ok_or_else(|| AppError::Validation("category is required".to_string()))?;
    let file = file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    let meta = FileMeta {
        size: file.body.len() as u64,
        content_type: &file.content_type,
    };
    if let Some(message) = validate_file(&meta, category) {
        info!(
            "Rejected {} upload for user {user_id}: {message}",
            category.as_str()
        );
        return Ok(Json(UploadResponse {
            success: false,
            message,
            category,
            url: None,
            key: None,
        }));
    }

    let attachment = state
        .attachments
        .upload(NewUpload {
            user_id,
            category,
            file_name: file.file_name,
            content_type: file.content_type,
            body: file.body,
        })
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        category,
        url: Some(attachment.url),
        key: Some(attachment.key),
    }))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Could not read multipart field: {e}"))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::testing::test_context;

    const BOUNDARY: &str = "cvboundary";

    fn multipart_body(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file {
                Some((file_name, content_type)) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::post("/api/v1/documents/upload-document")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_of(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upload_certificate() {
        let ctx = test_context();
        let user = uuid::Uuid::new_v4().to_string();
        let body = multipart_body(&[
            ("userId", None, user.as_bytes()),
            ("category", None, b"certificate"),
            ("file", Some(("step1 result.pdf", "application/pdf")), b"%PDF-1.4"),
        ]);

        let resp = build_router(ctx.state.clone())
            .oneshot(upload_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_of(resp).await;
        assert_eq!(json["success"], true);
        let key = json["key"].as_str().unwrap();
        assert!(key.starts_with(&format!("attachments/{user}/certificate/")));
        assert!(json["url"].as_str().unwrap().ends_with(key));

        let uploads = ctx.attachments.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].content_type, "application/pdf");
        assert_eq!(&uploads[0].body[..], b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_upload_wrong_type_is_refused() {
        let ctx = test_context();
        let user = uuid::Uuid::new_v4().to_string();
        let body = multipart_body(&[
            ("userId", None, user.as_bytes()),
            ("category", None, b"profilePhoto"),
            ("file", Some(("cv.pdf", "application/pdf")), b"%PDF-1.4"),
        ]);

        let resp = build_router(ctx.state.clone())
            .oneshot(upload_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_of(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["category"], "profilePhoto");
        assert!(json.get("url").is_none());
        assert!(ctx.attachments.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_bad_request() {
        let ctx = test_context();
        let user = uuid::Uuid::new_v4().to_string();
        let body = multipart_body(&[
            ("userId", None, user.as_bytes()),
            ("category", None, b"certificate"),
        ]);

        let resp = build_router(ctx.state)
            .oneshot(upload_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_of(resp).await;
        assert_eq!(json["error"]["message"], "file is required");
    }

    #[tokio::test]
    async fn test_upload_unknown_category_is_bad_request() {
        let ctx = test_context();
        let body = multipart_body(&[("category", None, b"selfie")]);

        let resp = build_router(ctx.state)
            .oneshot(upload_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
