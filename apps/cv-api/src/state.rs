use std::sync::Arc;

use crate::attachments::AttachmentStore;
use crate::cv::progress::ProgressStore;
use crate::cv::repository::CvRepository;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Collaborators are trait objects: Postgres, Redis and S3 in production,
/// in-memory doubles in tests.
#[derive(Clone)]
pub struct AppState {
    pub cvs: Arc<dyn CvRepository>,
    /// Completed-step set backing the step-completion hook.
    pub progress: Arc<dyn ProgressStore>,
    pub attachments: Arc<dyn AttachmentStore>,
}
