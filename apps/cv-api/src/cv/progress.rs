//! Completed-step bookkeeping kept alongside the CV.
//!
//! The set stored here is what `CompletionTracker` is seeded with, so a step
//! reported complete in an earlier session does not fire again.

use std::collections::BTreeSet;

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;
use uuid::Uuid;

use crate::cv::step::WizardStep;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn reported_steps(&self, user_id: Uuid) -> Result<BTreeSet<WizardStep>, ProgressError>;

    /// Adds `steps` to the user's set and returns the ones that were not
    /// already members. Only those count as first completions.
    async fn record_completed(
        &self,
        user_id: Uuid,
        steps: &[WizardStep],
    ) -> Result<Vec<WizardStep>, ProgressError>;
}

#[derive(Clone)]
pub struct RedisProgressStore {
    client: redis::Client,
}

impl RedisProgressStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

fn progress_key(user_id: Uuid) -> String {
    format!("cv:progress:{user_id}")
}

fn newly_added(steps: &[WizardStep], replies: &[u32]) -> Vec<WizardStep> {
    steps
        .iter()
        .zip(replies)
        .filter(|(_, added)| **added == 1)
        .map(|(step, _)| *step)
        .collect()
}

#[async_trait]
impl ProgressStore for RedisProgressStore {
    async fn reported_steps(&self, user_id: Uuid) -> Result<BTreeSet<WizardStep>, ProgressError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let members: Vec<u32> = conn.smembers(progress_key(user_id)).await?;
        Ok(members
            .into_iter()
            .filter_map(|n| u8::try_from(n).ok())
            .filter_map(|n| WizardStep::from_number(n).ok())
            .collect())
    }

    async fn record_completed(
        &self,
        user_id: Uuid,
        steps: &[WizardStep],
    ) -> Result<Vec<WizardStep>, ProgressError> {
        if steps.is_empty() {
            return Ok(Vec::new());
        }
        let key = progress_key(user_id);
        let mut pipe = redis::pipe();
        for step in steps {
            pipe.sadd(&key, u32::from(step.number()));
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // One SADD per step: a reply of 1 means this call inserted it
        let added: Vec<u32> = pipe.query_async(&mut conn).await?;
        Ok(newly_added(steps, &added))
    }
}
