//! The aggregate CV record edited by the wizard, one per user.
//!
//! Every section defaults to its empty value, so `CvDocument::default()` is
//! the template handed out on first load. Field names serialize in camelCase
//! to match what the wizard front end sends.

use std::collections::BTreeSet;

use serde::de::value::StringDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

/// Returns true when `value` has content once surrounding whitespace is gone.
pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Reference to a stored upload, as returned by the attachment store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CvDocument {
    pub basic_details: BasicDetails,
    pub education: Education,
    pub usmle_scores: UsmleScores,
    pub us_clinical_experience: UsClinicalExperience,
    pub skills: Skills,
    pub achievements: Vec<Achievement>,
    pub publications: Vec<Publication>,
    pub conferences: Vec<Conference>,
    pub workshops: Vec<Workshop>,
    pub professional_experiences: Vec<ProfessionalExperience>,
    pub volunteer_experiences: Vec<VolunteerExperience>,
    pub work_experience: Vec<WorkExperience>,
    pub emr_rcm_training: EmrRcmTraining,
    pub acls_bls: AclsBls,
    pub significant_achievements: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Step 1: basic details
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub medical_school: String,
    pub graduation_year: String,
    pub city: String,
    pub gender: String,
    pub nationality: String,
    pub usmle_id: String,
    pub address: String,
    pub languages: Vec<Language>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    pub language: String,
    pub fluency: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Step 2: education
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub schooling: SchoolRecord,
    pub college: CollegeRecord,
    pub graduation: DegreeRecord,
    pub post_graduation: DegreeRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SchoolRecord {
    pub school_name: String,
    pub board: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_year: String,
    pub passing_year: String,
    pub percentage: String,
}

/// Pre-medical college (12th grade / undergraduate science).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CollegeRecord {
    pub college_name: String,
    pub stream: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_year: String,
    pub passing_year: String,
    pub percentage: String,
}

/// Medical degree (MBBS/MD) or a postgraduate degree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DegreeRecord {
    pub university_name: String,
    pub degree: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_year: String,
    pub end_year: String,
    pub grade: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Step 3: USMLE scores
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Step1Status {
    NotTaken,
    Pass,
    Fail,
}

impl Step1Status {
    pub fn label(self) -> &'static str {
        match self {
            Step1Status::NotTaken => "Not taken",
            Step1Status::Pass => "Pass",
            Step1Status::Fail => "Fail",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UsmleScores {
    /// The form's blank choice arrives as `""` and means unset.
    #[serde(deserialize_with = "blank_as_none")]
    pub step1_status: Option<Step1Status>,
    pub step2ck_score: String,
    pub step2cs_status: String,
    pub oet_score: String,
    pub ecfmg_certified: bool,
    pub certificates: Vec<Attachment>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Step1Status>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => {
            Step1Status::deserialize(StringDeserializer::<D::Error>::new(raw)).map(Some)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Step 4: US clinical experience
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UsClinicalExperience {
    pub list: Vec<ClinicalExperience>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClinicalExperience {
    pub id: Option<String>,
    pub institution: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub attachment: Option<Attachment>,
}

// ────────────────────────────────────────────────────────────────────────────
// Step 5: skills
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Skills {
    pub skills_list: String,
    pub supporting_documents: Vec<SupportingDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SupportingDocument {
    pub id: Option<String>,
    pub name: String,
    pub attachment: Option<Attachment>,
}

// ────────────────────────────────────────────────────────────────────────────
// Free-form sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Achievement {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub year: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    pub id: Option<String>,
    pub title: String,
    pub journal: String,
    pub year: String,
    pub authors: String,
    pub link: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Conference {
    pub id: Option<String>,
    pub name: String,
    pub role: String,
    pub year: String,
    pub location: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Workshop {
    pub id: Option<String>,
    pub name: String,
    pub organizer: String,
    pub year: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfessionalExperience {
    pub id: Option<String>,
    pub organization: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VolunteerExperience {
    pub id: Option<String>,
    pub organization: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: Option<String>,
    pub employer: String,
    pub job_title: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EmrRcmTraining {
    pub emr_systems: BTreeSet<String>,
    pub rcm_training: bool,
    pub duration: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AclsBls {
    pub acls_certified: bool,
    pub acls_issue_date: String,
    pub acls_expiry_date: String,
    pub bls_certified: bool,
    pub bls_issue_date: String,
    pub bls_expiry_date: String,
    pub provider: String,
}
