//! Step navigation for the CV wizard as a reducer over `(state, action)`.
//!
//! The caller owns the current step (URL, session, persisted row) and feeds
//! it back in; nothing here keeps state between calls or performs I/O.

use serde::{Deserialize, Serialize};

use crate::cv::document::CvDocument;
use crate::cv::step::WizardStep;
use crate::cv::step_validation::{missing_fields, missing_fields_message};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WizardAction {
    Next,
    Previous,
    /// Direct jump from the step menu. Never validated.
    GoTo { step: WizardStep },
    /// Validate the current step before the caller persists the document.
    SaveProgress,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub step: WizardStep,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Transition {
    #[serde(rename_all = "camelCase")]
    Moved { from: WizardStep, to: WizardStep },
    /// Validation blocked the action; the state is unchanged.
    #[serde(rename_all = "camelCase")]
    Refused {
        step: WizardStep,
        missing_fields: Vec<String>,
        message: String,
    },
    /// `SaveProgress` passed validation. The caller persists the document and
    /// then calls [`WizardState::after_save`]; on persistence failure it keeps
    /// the current state.
    #[serde(rename_all = "camelCase")]
    ReadyToSave { step: WizardStep },
}

impl Transition {
    /// The step the wizard is on once this transition is taken.
    pub fn step(&self) -> WizardStep {
        match self {
            Transition::Moved { to, .. } => *to,
            Transition::Refused { step, .. } | Transition::ReadyToSave { step } => *step,
        }
    }
}

impl WizardState {
    pub fn new(step: WizardStep) -> Self {
        Self { step }
    }

    pub fn apply(self, action: WizardAction, doc: &CvDocument) -> Transition {
        match action {
            WizardAction::Next => {
                if self.step.is_gated() {
                    if let Some(refused) = self.refuse_if_missing(doc) {
                        return refused;
                    }
                }
                self.move_to(self.step.next())
            }
            WizardAction::Previous => self.move_to(self.step.previous()),
            WizardAction::GoTo { step } => self.move_to(step),
            WizardAction::SaveProgress => self
                .refuse_if_missing(doc)
                .unwrap_or(Transition::ReadyToSave { step: self.step }),
        }
    }

    /// State after a `SaveProgress` whose persistence succeeded.
    pub fn after_save(self) -> WizardState {
        WizardState::new(self.step.next())
    }

    fn move_to(self, to: WizardStep) -> Transition {
        Transition::Moved {
            from: self.step,
            to,
        }
    }

    fn refuse_if_missing(self, doc: &CvDocument) -> Option<Transition> {
        let missing = missing_fields(self.step, doc);
        if missing.is_empty() {
            return None;
        }
        Some(Transition::Refused {
            step: self.step,
            message: missing_fields_message(&missing),
            missing_fields: missing,
        })
    }
}
