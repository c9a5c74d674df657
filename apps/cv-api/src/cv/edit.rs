//! Pure edits over a `CvDocument`.
//!
//! Each `DocumentEdit` names the shape of change it makes instead of relying
//! on the section name: scalar replacement, wholesale education sub-record
//! replacement, a leaf set inside a record section, or a list operation.
//! `apply` never mutates its input; a failed edit leaves the caller's
//! document as it was.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::cv::completion::completed_steps;
use crate::cv::document::{Attachment, CollegeRecord, CvDocument, DegreeRecord, SchoolRecord};
use crate::cv::step::WizardStep;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScalarField {
    SignificantAchievements,
}

/// An education sub-record; replacing one swaps the whole record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum EducationPart {
    Schooling(SchoolRecord),
    College(CollegeRecord),
    Graduation(DegreeRecord),
    PostGraduation(DegreeRecord),
}

/// Record-valued sections whose leaves are set one at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordSection {
    BasicDetails,
    UsmleScores,
    Skills,
    EmrRcmTraining,
    AclsBls,
}

impl RecordSection {
    pub fn key(self) -> &'static str {
        match self {
            RecordSection::BasicDetails => "basicDetails",
            RecordSection::UsmleScores => "usmleScores",
            RecordSection::Skills => "skills",
            RecordSection::EmrRcmTraining => "emrRcmTraining",
            RecordSection::AclsBls => "aclsBls",
        }
    }
}

/// Ordered sequences of records inside the document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ListSection {
    Achievements,
    Publications,
    Conferences,
    Workshops,
    ProfessionalExperiences,
    VolunteerExperiences,
    WorkExperience,
    UsClinicalExperience,
    SupportingDocuments,
    Languages,
    Certificates,
}

impl ListSection {
    pub fn name(self) -> &'static str {
        match self {
            ListSection::Achievements => "achievements",
            ListSection::Publications => "publications",
            ListSection::Conferences => "conferences",
            ListSection::Workshops => "workshops",
            ListSection::ProfessionalExperiences => "professionalExperiences",
            ListSection::VolunteerExperiences => "volunteerExperiences",
            ListSection::WorkExperience => "workExperience",
            ListSection::UsClinicalExperience => "usClinicalExperience",
            ListSection::SupportingDocuments => "supportingDocuments",
            ListSection::Languages => "languages",
            ListSection::Certificates => "certificates",
        }
    }

    /// JSON pointer to the array inside a serialized document.
    fn pointer(self) -> &'static str {
        match self {
            ListSection::Achievements => "/achievements",
            ListSection::Publications => "/publications",
            ListSection::Conferences => "/conferences",
            ListSection::Workshops => "/workshops",
            ListSection::ProfessionalExperiences => "/professionalExperiences",
            ListSection::VolunteerExperiences => "/volunteerExperiences",
            ListSection::WorkExperience => "/workExperience",
            ListSection::UsClinicalExperience => "/usClinicalExperience/list",
            ListSection::SupportingDocuments => "/skills/supportingDocuments",
            ListSection::Languages => "/basicDetails/languages",
            ListSection::Certificates => "/usmleScores/certificates",
        }
    }

    /// The attachment reference carried by a removed item, if any.
    fn attachment_of(self, item: &Value) -> Option<Attachment> {
        let attachment = match self {
            ListSection::Certificates => item.clone(),
            ListSection::Languages => return None,
            _ => item.get("attachment")?.clone(),
        };
        serde_json::from_value(attachment).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DocumentEdit {
    #[serde(rename_all = "camelCase")]
    SetScalar { field: ScalarField, value: String },
    #[serde(rename_all = "camelCase")]
    ReplaceEducation { part: EducationPart },
    #[serde(rename_all = "camelCase")]
    SetLeaf {
        section: RecordSection,
        field: String,
        value: Value,
    },
    #[serde(rename_all = "camelCase")]
    AddItem { section: ListSection, item: Value },
    #[serde(rename_all = "camelCase")]
    RemoveItem { section: ListSection, index: usize },
    #[serde(rename_all = "camelCase")]
    UpdateItem {
        section: ListSection,
        index: usize,
        field: String,
        value: Value,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("index {index} is out of range for {section} (length {len})")]
    IndexOutOfRange {
        section: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{section} has no field '{field}'")]
    UnknownField {
        section: &'static str,
        field: String,
    },

    #[error("invalid value for {section}: {message}")]
    InvalidValue {
        section: &'static str,
        message: String,
    },
}

/// Result of a successful edit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub document: CvDocument,
    /// Completion recomputed against `document`.
    pub completed_steps: BTreeSet<WizardStep>,
    /// Attachment reference dropped by a `RemoveItem`. The stored file itself
    /// is left untouched.
    pub removed_attachment: Option<Attachment>,
}

/// Applies `edit` to a copy of `doc`.
pub fn apply(doc: &CvDocument, edit: &DocumentEdit) -> Result<EditOutcome, EditError> {
    let mut removed_attachment = None;

    let document = match edit {
        DocumentEdit::SetScalar { field, value } => {
            let mut next = doc.clone();
            match field {
                ScalarField::SignificantAchievements => {
                    next.significant_achievements = value.clone()
                }
            }
            next
        }
        DocumentEdit::ReplaceEducation { part } => {
            let mut next = doc.clone();
            match part {
                EducationPart::Schooling(r) => next.education.schooling = r.clone(),
                EducationPart::College(r) => next.education.college = r.clone(),
                EducationPart::Graduation(r) => next.education.graduation = r.clone(),
                EducationPart::PostGraduation(r) => next.education.post_graduation = r.clone(),
            }
            next
        }
        DocumentEdit::SetLeaf {
            section,
            field,
            value,
        } => {
            let name = section.key();
            let mut tree = to_tree(doc, name)?;
            let record = tree
                .get_mut(name)
                .and_then(Value::as_object_mut)
                .ok_or_else(|| invalid(name, "section is not a record"))?;
            let slot = record.get_mut(field).ok_or_else(|| EditError::UnknownField {
                section: name,
                field: field.clone(),
            })?;
            *slot = value.clone();
            from_tree(tree, name)?
        }
        DocumentEdit::AddItem { section, item } => {
            let name = section.name();
            let mut tree = to_tree(doc, name)?;
            list_mut(&mut tree, *section)?.push(item.clone());
            from_tree(tree, name)?
        }
        DocumentEdit::RemoveItem { section, index } => {
            let name = section.name();
            let mut tree = to_tree(doc, name)?;
            let list = list_mut(&mut tree, *section)?;
            check_index(name, *index, list.len())?;
            let removed = list.remove(*index);
            removed_attachment = section.attachment_of(&removed);
            from_tree(tree, name)?
        }
        DocumentEdit::UpdateItem {
            section,
            index,
            field,
            value,
        } => {
            let name = section.name();
            let mut tree = to_tree(doc, name)?;
            let list = list_mut(&mut tree, *section)?;
            check_index(name, *index, list.len())?;
            let record = list[*index]
                .as_object_mut()
                .ok_or_else(|| invalid(name, "item is not a record"))?;
            let slot = record.get_mut(field).ok_or_else(|| EditError::UnknownField {
                section: name,
                field: field.clone(),
            })?;
            *slot = value.clone();
            from_tree(tree, name)?
        }
    };

    let completed_steps = completed_steps(&document);
    Ok(EditOutcome {
        document,
        completed_steps,
        removed_attachment,
    })
}

fn invalid(section: &'static str, message: impl Into<String>) -> EditError {
    EditError::InvalidValue {
        section,
        message: message.into(),
    }
}

fn to_tree(doc: &CvDocument, section: &'static str) -> Result<Value, EditError> {
    serde_json::to_value(doc).map_err(|e| invalid(section, e.to_string()))
}

fn from_tree(tree: Value, section: &'static str) -> Result<CvDocument, EditError> {
    serde_json::from_value(tree).map_err(|e| invalid(section, e.to_string()))
}

fn list_mut(tree: &mut Value, section: ListSection) -> Result<&mut Vec<Value>, EditError> {
    tree.pointer_mut(section.pointer())
        .and_then(Value::as_array_mut)
        .ok_or_else(|| invalid(section.name(), "section is not a list"))
}

fn check_index(section: &'static str, index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange {
            section,
            index,
            len,
        })
    }
}
