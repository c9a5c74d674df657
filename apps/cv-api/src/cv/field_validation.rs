//! Per-field input rules for wizard form fields and upload slots.
//!
//! Both entry points return `Option<String>`: `None` when the value is
//! acceptable, otherwise the message of the first rule it breaks. Nothing
//! here performs I/O.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const NAME_PATTERN: &str = r"^[A-Za-z][A-Za-z .'\-]*$";
const PHONE_PATTERN: &str = r"^\+?[0-9 ()\-]+$";
const YEAR_PATTERN: &str = r"^[0-9]{4}$";
const INTEGER_PATTERN: &str = r"^[0-9]+$";
const DECIMAL_PATTERN: &str = r"^[0-9]+(\.[0-9]+)?$";
const USMLE_ID_PATTERN: &str = r"^[A-Za-z0-9]{8}$";

const MIN_YEAR: i64 = 1950;
const MAX_YEAR: i64 = 2040;

struct FieldRules {
    name: &'static str,
    label: &'static str,
    required: bool,
    pattern: Option<(&'static str, &'static str)>,
    min: Option<i64>,
    max: Option<i64>,
    min_len: Option<usize>,
    max_len: Option<usize>,
}

impl FieldRules {
    const fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            pattern: None,
            min: None,
            max: None,
            min_len: None,
            max_len: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn pattern(mut self, pattern: &'static str, message: &'static str) -> Self {
        self.pattern = Some((pattern, message));
        self
    }

    const fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_len = Some(min);
        self.max_len = Some(max);
        self
    }

    const fn year(self) -> Self {
        self.pattern(YEAR_PATTERN, "Please enter a 4-digit year")
            .range(MIN_YEAR, MAX_YEAR)
    }
}

static FIELD_RULES: &[FieldRules] = &[
    FieldRules::new("fullName", "Full Name")
        .required()
        .pattern(NAME_PATTERN, "Name may only contain letters, spaces, and . ' -")
        .length(2, 100),
    FieldRules::new("email", "Email")
        .required()
        .pattern(EMAIL_PATTERN, "Please enter a valid email address"),
    FieldRules::new("phone", "Phone")
        .required()
        .pattern(PHONE_PATTERN, "Please enter a valid phone number")
        .length(7, 20),
    FieldRules::new("medicalSchool", "Medical School")
        .required()
        .length(2, 200),
    FieldRules::new("graduationYear", "Graduation Year")
        .required()
        .year(),
    FieldRules::new("city", "City").required().length(2, 100),
    FieldRules::new("usmleId", "USMLE ID")
        .pattern(USMLE_ID_PATTERN, "USMLE ID must be 8 letters or digits"),
    FieldRules::new("step2ckScore", "Step 2 CK Score")
        .pattern(INTEGER_PATTERN, "Step 2 CK Score must be a whole number")
        .range(1, 300),
    FieldRules::new("oetScore", "OET Score")
        .pattern(INTEGER_PATTERN, "OET Score must be a whole number")
        .range(0, 500),
    FieldRules::new("percentage", "Percentage")
        .pattern(DECIMAL_PATTERN, "Percentage must be a number")
        .range(0, 100),
    FieldRules::new("passingYear", "Passing Year").year(),
    FieldRules::new("startYear", "Start Year").year(),
    FieldRules::new("endYear", "End Year").year(),
];

static COMPILED: LazyLock<Vec<(&'static FieldRules, Option<Regex>)>> = LazyLock::new(|| {
    FIELD_RULES
        .iter()
        .map(|rules| {
            let regex = rules
                .pattern
                .map(|(p, _)| Regex::new(p).expect("field pattern must compile"));
            (rules, regex)
        })
        .collect()
});

/// Validates one raw form value against the rules registered for `field`.
///
/// A blank value on a field that is not required passes without further
/// checks. Fields with no registered rules always pass.
pub fn validate_field(field: &str, raw: &str) -> Option<String> {
    let (rules, regex) = COMPILED.iter().find(|(r, _)| r.name == field)?;
    let value = raw.trim();

    if value.is_empty() {
        return rules
            .required
            .then(|| format!("{} is required", rules.label));
    }

    if let (Some(regex), Some((_, message))) = (regex, rules.pattern) {
        if !regex.is_match(value) {
            return Some(message.to_string());
        }
    }

    if rules.min.is_some() || rules.max.is_some() {
        let Ok(number) = f64::from_str(value) else {
            return Some(format!("{} must be a number", rules.label));
        };
        if let Some(min) = rules.min.filter(|min| number < *min as f64) {
            return Some(format!("{} must be at least {}", rules.label, min));
        }
        if let Some(max) = rules.max.filter(|max| number > *max as f64) {
            return Some(format!("{} must be at most {}", rules.label, max));
        }
    }

    let len = value.chars().count();
    if let Some(min_len) = rules.min_len.filter(|min| len < *min) {
        return Some(format!(
            "{} must be at least {} characters",
            rules.label, min_len
        ));
    }
    if let Some(max_len) = rules.max_len.filter(|max| len > *max) {
        return Some(format!(
            "{} must be at most {} characters",
            rules.label, max_len
        ));
    }

    None
}

// ────────────────────────────────────────────────────────────────────────────
// Upload slots
// ────────────────────────────────────────────────────────────────────────────

const MIB: u64 = 1024 * 1024;

const PDF: &str = "application/pdf";
const JPEG: &str = "image/jpeg";
const PNG: &str = "image/png";
const DOC: &str = "application/msword";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentCategory {
    Certificate,
    SupportingDocument,
    ProfilePhoto,
}

impl AttachmentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentCategory::Certificate => "certificate",
            AttachmentCategory::SupportingDocument => "supportingDocument",
            AttachmentCategory::ProfilePhoto => "profilePhoto",
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            AttachmentCategory::Certificate => 5 * MIB,
            AttachmentCategory::SupportingDocument => 10 * MIB,
            AttachmentCategory::ProfilePhoto => 2 * MIB,
        }
    }

    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            AttachmentCategory::Certificate => &[PDF, JPEG, PNG],
            AttachmentCategory::SupportingDocument => &[PDF, JPEG, PNG, DOC, DOCX],
            AttachmentCategory::ProfilePhoto => &[JPEG, PNG],
        }
    }

    fn allowed_description(self) -> &'static str {
        match self {
            AttachmentCategory::Certificate => "PDF, JPEG or PNG",
            AttachmentCategory::SupportingDocument => "PDF, JPEG, PNG, DOC or DOCX",
            AttachmentCategory::ProfilePhoto => "JPEG or PNG",
        }
    }
}

impl FromStr for AttachmentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "certificate" => Ok(AttachmentCategory::Certificate),
            "supportingDocument" => Ok(AttachmentCategory::SupportingDocument),
            "profilePhoto" => Ok(AttachmentCategory::ProfilePhoto),
            other => Err(format!("Unknown attachment category '{other}'")),
        }
    }
}

/// What the upload validator needs to know about a candidate file.
#[derive(Debug, Clone)]
pub struct FileMeta<'a> {
    pub size: u64,
    pub content_type: &'a str,
}

/// Checks an upload against its slot's size ceiling, then its type allow-list.
pub fn validate_file(file: &FileMeta<'_>, category: AttachmentCategory) -> Option<String> {
    if file.size == 0 {
        return Some("File is empty".to_string());
    }
    if file.size > category.max_bytes() {
        return Some(format!(
            "File size must be less than {} MB",
            category.max_bytes() / MIB
        ));
    }
    let content_type = file
        .content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !category.allowed_types().contains(&content_type.as_str()) {
        return Some(format!(
            "Only {} files are allowed",
            category.allowed_description()
        ));
    }
    None
}
