use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cv::completion::{completed_steps, CompletionTracker};
use crate::cv::document::CvDocument;
use crate::cv::progress::ProgressStore;
use crate::cv::repository::{CvRepository, RepositoryError};
use crate::cv::step::WizardStep;
use crate::cv::wizard::{Transition, WizardAction, WizardState};

/// A user's CV as the wizard sees it on load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvView {
    pub user_id: Uuid,
    pub document: CvDocument,
    pub current_step: WizardStep,
    pub completed_steps: BTreeSet<WizardStep>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub success: bool,
    pub message: String,
    pub current_step: WizardStep,
    pub completed_steps: BTreeSet<WizardStep>,
    pub newly_completed_steps: Vec<WizardStep>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SaveProgressOutcome {
    /// Required fields are missing; nothing was persisted.
    #[serde(rename_all = "camelCase")]
    Refused {
        step: WizardStep,
        missing_fields: Vec<String>,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Saved {
        previous_step: WizardStep,
        report: SaveReport,
    },
}

/// Loads a user's CV, creating and storing the empty template on first use.
pub async fn load_or_create(repo: &dyn CvRepository, user_id: Uuid) -> Result<CvView, RepositoryError> {
    if let Some(stored) = repo.fetch(user_id).await? {
        return Ok(CvView {
            user_id,
            completed_steps: completed_steps(&stored.document),
            document: stored.document,
            current_step: stored.current_step,
            updated_at: Some(stored.updated_at),
        });
    }

    let document = CvDocument::default();
    repo.save(user_id, &document, WizardStep::FIRST).await?;
    info!("Created empty CV for user {user_id}");

    Ok(CvView {
        user_id,
        completed_steps: completed_steps(&document),
        document,
        current_step: WizardStep::FIRST,
        updated_at: None,
    })
}

/// Persists the whole document without validation.
///
/// When `current_step` is absent the stored step is kept.
pub async fn save_document(
    repo: &dyn CvRepository,
    progress: &dyn ProgressStore,
    user_id: Uuid,
    document: &CvDocument,
    current_step: Option<WizardStep>,
) -> Result<SaveReport, RepositoryError> {
    let step = match current_step {
        Some(step) => step,
        None => repo
            .fetch(user_id)
            .await?
            .map(|stored| stored.current_step)
            .unwrap_or(WizardStep::FIRST),
    };
    repo.save(user_id, document, step).await?;
    info!("Saved CV for user {user_id}");

    let newly_completed_steps = notify_completed(progress, user_id, document).await;
    Ok(SaveReport {
        success: true,
        message: "CV saved successfully".to_string(),
        current_step: step,
        completed_steps: completed_steps(document),
        newly_completed_steps,
    })
}

/// Validates the current step, persists, then advances.
///
/// A persistence failure is returned as an error and the caller stays on
/// `state.step`.
pub async fn save_progress(
    repo: &dyn CvRepository,
    progress: &dyn ProgressStore,
    user_id: Uuid,
    state: WizardState,
    document: &CvDocument,
) -> Result<SaveProgressOutcome, RepositoryError> {
    match state.apply(WizardAction::SaveProgress, document) {
        Transition::Refused {
            step,
            missing_fields,
            message,
        } => {
            info!(
                "Save progress refused for user {user_id} on step {}: {} missing",
                step.number(),
                missing_fields.len()
            );
            Ok(SaveProgressOutcome::Refused {
                step,
                missing_fields,
                message,
            })
        }
        Transition::ReadyToSave { .. } | Transition::Moved { .. } => {
            let advanced = state.after_save();
            let report =
                save_document(repo, progress, user_id, document, Some(advanced.step)).await?;
            Ok(SaveProgressOutcome::Saved {
                previous_step: state.step,
                report: SaveReport {
                    message: "Progress saved".to_string(),
                    ..report
                },
            })
        }
    }
}

/// Step-completion hook: reports steps completed for the first time and
/// records them. Failures here are logged and never fail the save.
///
/// The store decides what is new, so two racing saves, or a save after a
/// failed write, still report each step once.
async fn notify_completed(
    progress: &dyn ProgressStore,
    user_id: Uuid,
    document: &CvDocument,
) -> Vec<WizardStep> {
    let reported = match progress.reported_steps(user_id).await {
        Ok(reported) => reported,
        Err(e) => {
            warn!("Could not read completed steps for user {user_id}: {e}");
            return Vec::new();
        }
    };

    let candidates = CompletionTracker::seeded(reported).observe(document, |_| {});
    if candidates.is_empty() {
        return Vec::new();
    }

    let newly = match progress.record_completed(user_id, &candidates).await {
        Ok(newly) => newly,
        Err(e) => {
            warn!("Could not record completed steps for user {user_id}: {e}");
            return Vec::new();
        }
    };
    for step in &newly {
        info!("User {user_id} completed step {step}");
    }
    newly
}
