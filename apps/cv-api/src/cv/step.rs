use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the eleven ordered sections of the CV wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    BasicDetails = 1,
    Education = 2,
    UsmleScores = 3,
    UsClinicalExperience = 4,
    Skills = 5,
    Achievements = 6,
    Publications = 7,
    Conferences = 8,
    EmrRcmTraining = 9,
    Workshops = 10,
    Review = 11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("step {0} is outside 1..=11")]
pub struct InvalidStep(pub u8);

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::BasicDetails;
    pub const LAST: WizardStep = WizardStep::Review;

    /// Last step whose required fields gate the "Next" action.
    pub const LAST_GATED: WizardStep = WizardStep::Skills;

    pub const ALL: [WizardStep; 11] = [
        WizardStep::BasicDetails,
        WizardStep::Education,
        WizardStep::UsmleScores,
        WizardStep::UsClinicalExperience,
        WizardStep::Skills,
        WizardStep::Achievements,
        WizardStep::Publications,
        WizardStep::Conferences,
        WizardStep::EmrRcmTraining,
        WizardStep::Workshops,
        WizardStep::Review,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Result<Self, InvalidStep> {
        n.checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
            .ok_or(InvalidStep(n))
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::BasicDetails => "Basic Details",
            WizardStep::Education => "Education",
            WizardStep::UsmleScores => "USMLE Scores",
            WizardStep::UsClinicalExperience => "US Clinical Experience",
            WizardStep::Skills => "Skills",
            WizardStep::Achievements => "Achievements",
            WizardStep::Publications => "Publications",
            WizardStep::Conferences => "Conferences",
            WizardStep::EmrRcmTraining => "EMR & RCM Training",
            WizardStep::Workshops => "Workshops",
            WizardStep::Review => "Review",
        }
    }

    /// Following step, clamped at `Review`.
    pub fn next(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(Self::LAST)
    }

    /// Preceding step, clamped at `BasicDetails`.
    pub fn previous(self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(Self::FIRST)
    }

    pub fn is_gated(self) -> bool {
        self <= Self::LAST_GATED
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = InvalidStep;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}
