use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::cv::document::CvDocument;
use crate::cv::step::WizardStep;
use crate::models::cv::CvDocumentRow;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored CV document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("stored wizard step {0} is out of range")]
    InvalidStep(i32),
}

/// A user's CV as last persisted.
#[derive(Debug, Clone)]
pub struct StoredCv {
    pub document: CvDocument,
    pub current_step: WizardStep,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CvDocumentRow> for StoredCv {
    type Error = RepositoryError;

    fn try_from(row: CvDocumentRow) -> Result<Self, Self::Error> {
        let current_step = u8::try_from(row.current_step)
            .ok()
            .and_then(|n| WizardStep::from_number(n).ok())
            .ok_or(RepositoryError::InvalidStep(row.current_step))?;
        Ok(StoredCv {
            document: serde_json::from_value(row.document)?,
            current_step,
            updated_at: row.updated_at,
        })
    }
}

/// Whole-document persistence keyed by user id.
///
/// `save` replaces the stored document atomically; there is no partial write.
#[async_trait]
pub trait CvRepository: Send + Sync {
    async fn fetch(&self, user_id: Uuid) -> Result<Option<StoredCv>, RepositoryError>;

    async fn save(
        &self,
        user_id: Uuid,
        document: &CvDocument,
        current_step: WizardStep,
    ) -> Result<(), RepositoryError>;
}

#[derive(Clone)]
pub struct PgCvRepository {
    pool: PgPool,
}

impl PgCvRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CvRepository for PgCvRepository {
    async fn fetch(&self, user_id: Uuid) -> Result<Option<StoredCv>, RepositoryError> {
        let row: Option<CvDocumentRow> =
            sqlx::query_as("SELECT * FROM cv_documents WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(StoredCv::try_from).transpose()
    }

    async fn save(
        &self,
        user_id: Uuid,
        document: &CvDocument,
        current_step: WizardStep,
    ) -> Result<(), RepositoryError> {
        let data = serde_json::to_value(document)?;
        sqlx::query(
            r#"
            INSERT INTO cv_documents (user_id, document, current_step)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET document = EXCLUDED.document,
                current_step = EXCLUDED.current_step,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(data)
        .bind(i32::from(current_step.number()))
        .execute(&self.pool)
        .await?;

        debug!("Stored CV for user {user_id} at step {}", current_step.number());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(document: serde_json::Value, current_step: i32) -> CvDocumentRow {
        CvDocumentRow {
            user_id: Uuid::new_v4(),
            document,
            current_step,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts() {
        let stored = StoredCv::try_from(row(
            json!({ "basicDetails": { "fullName": "A" } }),
            4,
        ))
        .unwrap();
        assert_eq!(stored.document.basic_details.full_name, "A");
        assert_eq!(stored.current_step, WizardStep::UsClinicalExperience);
    }

    #[test]
    fn test_row_with_bad_step_rejected() {
        let err = StoredCv::try_from(row(json!({}), 42)).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidStep(42)));
    }

    #[test]
    fn test_row_with_bad_document_rejected() {
        let err = StoredCv::try_from(row(json!({ "publications": "none" }), 1)).unwrap_err();
        assert!(matches!(err, RepositoryError::Malformed(_)));
    }
}
