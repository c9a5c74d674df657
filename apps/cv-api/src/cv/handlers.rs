//! Axum route handlers for the CV wizard API.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cv::completion::is_step_complete;
use crate::cv::document::CvDocument;
use crate::cv::edit::{apply, DocumentEdit, EditOutcome};
use crate::cv::field_validation::validate_field;
use crate::cv::render::render_cv_to_md;
use crate::cv::service::{
    load_or_create, save_document, save_progress, CvView, SaveProgressOutcome, SaveReport,
};
use crate::cv::step::WizardStep;
use crate::cv::step_validation::{missing_fields, missing_fields_message};
use crate::cv::wizard::{Transition, WizardAction, WizardState};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub user_id: Uuid,
    pub document: CvDocument,
    pub current_step: Option<WizardStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressRequest {
    pub user_id: Uuid,
    pub step: WizardStep,
    pub document: CvDocument,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub document: CvDocument,
    pub edit: DocumentEdit,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub step: WizardStep,
    pub action: WizardAction,
    pub document: CvDocument,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateStepRequest {
    pub step: WizardStep,
    pub document: CvDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateStepResponse {
    pub step: WizardStep,
    pub missing_fields: Vec<String>,
    pub message: String,
    pub complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct ValidateFieldRequest {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateFieldResponse {
    pub field: String,
    /// Empty when the value is acceptable.
    pub error: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/cv/:user_id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CvView>, AppError> {
    Ok(Json(load_or_create(state.cvs.as_ref(), user_id).await?))
}

/// POST /api/v1/cv/save
pub async fn handle_save(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveReport>, AppError> {
    let report = save_document(
        state.cvs.as_ref(),
        state.progress.as_ref(),
        req.user_id,
        &req.document,
        req.current_step,
    )
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/cv/save-progress
///
/// A refusal is a 200 carrying the missing fields; only persistence
/// failures are errors.
pub async fn handle_save_progress(
    State(state): State<AppState>,
    Json(req): Json<SaveProgressRequest>,
) -> Result<Json<SaveProgressOutcome>, AppError> {
    let outcome = save_progress(
        state.cvs.as_ref(),
        state.progress.as_ref(),
        req.user_id,
        WizardState::new(req.step),
        &req.document,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/cv/edit
pub async fn handle_edit(Json(req): Json<EditRequest>) -> Result<Json<EditOutcome>, AppError> {
    Ok(Json(apply(&req.document, &req.edit)?))
}

/// POST /api/v1/cv/navigate
pub async fn handle_navigate(Json(req): Json<NavigateRequest>) -> Result<Json<Transition>, AppError> {
    if req.action == WizardAction::SaveProgress {
        return Err(AppError::Validation(
            "saveProgress must be sent to /api/v1/cv/save-progress".to_string(),
        ));
    }
    Ok(Json(WizardState::new(req.step).apply(req.action, &req.document)))
}

/// POST /api/v1/cv/validate-step
pub async fn handle_validate_step(Json(req): Json<ValidateStepRequest>) -> Json<ValidateStepResponse> {
    let missing = missing_fields(req.step, &req.document);
    Json(ValidateStepResponse {
        step: req.step,
        message: missing_fields_message(&missing),
        missing_fields: missing,
        complete: is_step_complete(req.step, &req.document),
    })
}

/// POST /api/v1/cv/validate-field
pub async fn handle_validate_field(Json(req): Json<ValidateFieldRequest>) -> Json<ValidateFieldResponse> {
    let error = validate_field(&req.field, &req.value).unwrap_or_default();
    Json(ValidateFieldResponse {
        field: req.field,
        error,
    })
}

/// GET /api/v1/cv/:user_id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stored = state
        .cvs
        .fetch(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No CV for user {user_id}")))?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_cv_to_md(&stored.document),
    ))
}
