use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvDocumentRow {
    pub user_id: Uuid,
    pub document: Value,
    pub current_step: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
