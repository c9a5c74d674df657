use crate::cv::document::{is_filled, CvDocument};
use crate::cv::step::WizardStep;

/// How many field names a user-facing message lists before summarising.
const MESSAGE_NAME_LIMIT: usize = 5;

/// Returns the labels of required fields still empty on `step`, in the order
/// the form declares them.
///
/// Only steps 1–5 carry required fields; every later step passes.
pub fn missing_fields(step: WizardStep, doc: &CvDocument) -> Vec<String> {
    match step {
        WizardStep::BasicDetails => missing_basic_details(doc),
        WizardStep::Education => missing_education(doc),
        WizardStep::UsmleScores => missing_usmle_scores(doc),
        WizardStep::UsClinicalExperience => missing_clinical_experience(doc),
        WizardStep::Skills => missing_skills(doc),
        WizardStep::Achievements
        | WizardStep::Publications
        | WizardStep::Conferences
        | WizardStep::EmrRcmTraining
        | WizardStep::Workshops
        | WizardStep::Review => Vec::new(),
    }
}

/// Builds the refusal message shown when navigation is blocked.
///
/// Lists up to five names, then a count of the rest.
pub fn missing_fields_message(missing: &[String]) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let shown = missing
        .iter()
        .take(MESSAGE_NAME_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let remainder = missing.len().saturating_sub(MESSAGE_NAME_LIMIT);
    if remainder > 0 {
        format!("Please fill in the required fields: {shown} and {remainder} more")
    } else {
        format!("Please fill in the required fields: {shown}")
    }
}

fn collect_blank(checks: &[(&str, &str)]) -> Vec<String> {
    checks
        .iter()
        .filter(|(_, value)| !is_filled(value))
        .map(|(label, _)| label.to_string())
        .collect()
}

fn missing_basic_details(doc: &CvDocument) -> Vec<String> {
    let b = &doc.basic_details;
    collect_blank(&[
        ("Full Name", b.full_name.as_str()),
        ("Email", b.email.as_str()),
        ("Phone", b.phone.as_str()),
        ("Medical School", b.medical_school.as_str()),
        ("Graduation Year", b.graduation_year.as_str()),
        ("City", b.city.as_str()),
    ])
}

fn missing_education(doc: &CvDocument) -> Vec<String> {
    let s = &doc.education.schooling;
    let c = &doc.education.college;
    let g = &doc.education.graduation;
    collect_blank(&[
        ("Schooling: School Name", s.school_name.as_str()),
        ("Schooling: Board", s.board.as_str()),
        ("Schooling: City", s.city.as_str()),
        ("Schooling: Country", s.country.as_str()),
        ("Schooling: Passing Year", s.passing_year.as_str()),
        ("Schooling: Percentage", s.percentage.as_str()),
        ("College: College Name", c.college_name.as_str()),
        ("College: Stream", c.stream.as_str()),
        ("College: City", c.city.as_str()),
        ("College: Country", c.country.as_str()),
        ("College: Passing Year", c.passing_year.as_str()),
        ("College: Percentage", c.percentage.as_str()),
        ("Graduation: University Name", g.university_name.as_str()),
        ("Graduation: Degree", g.degree.as_str()),
        ("Graduation: City", g.city.as_str()),
        ("Graduation: Country", g.country.as_str()),
        ("Graduation: Start Year", g.start_year.as_str()),
        ("Graduation: End Year", g.end_year.as_str()),
        ("Graduation: Grade", g.grade.as_str()),
    ])
}

fn missing_usmle_scores(doc: &CvDocument) -> Vec<String> {
    if doc.usmle_scores.step1_status.is_some() {
        Vec::new()
    } else {
        vec!["USMLE Step 1 Status".to_string()]
    }
}

fn missing_clinical_experience(doc: &CvDocument) -> Vec<String> {
    let list = &doc.us_clinical_experience.list;
    if list.is_empty() {
        return vec!["At least one US Clinical Experience".to_string()];
    }

    let mut missing = Vec::new();
    for (i, exp) in list.iter().enumerate() {
        let n = i + 1;
        if !is_filled(&exp.institution) {
            missing.push(format!("Experience {n}: Institution"));
        }
        if !is_filled(&exp.role) {
            missing.push(format!("Experience {n}: Role"));
        }
        if !is_filled(&exp.start_date) {
            missing.push(format!("Experience {n}: Start Date"));
        }
        if !exp.current && !is_filled(&exp.end_date) {
            missing.push(format!("Experience {n}: End Date"));
        }
    }
    missing
}

fn missing_skills(doc: &CvDocument) -> Vec<String> {
    if is_filled(&doc.skills.skills_list) {
        Vec::new()
    } else {
        vec!["Skills".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::document::{ClinicalExperience, Publication, Step1Status};

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_document_step1() {
        let doc = CvDocument::default();
        assert_eq!(
            missing_fields(WizardStep::BasicDetails, &doc),
            labels(&[
                "Full Name",
                "Email",
                "Phone",
                "Medical School",
                "Graduation Year",
                "City"
            ])
        );
    }

    #[test]
    fn test_partial_basic_details() {
        let mut doc = CvDocument::default();
        doc.basic_details.full_name = "A".into();
        doc.basic_details.email = "a@b.com".into();
        assert_eq!(
            missing_fields(WizardStep::BasicDetails, &doc),
            labels(&["Phone", "Medical School", "Graduation Year", "City"])
        );
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut doc = CvDocument::default();
        doc.basic_details.city = "   ".into();
        assert!(missing_fields(WizardStep::BasicDetails, &doc).contains(&"City".to_string()));
    }

    #[test]
    fn test_filling_one_field_removes_only_its_label() {
        let empty = CvDocument::default();
        let before = missing_fields(WizardStep::Education, &empty);
        assert_eq!(before.len(), 19);

        let mut doc = empty.clone();
        doc.education.college.stream = "Biology".into();
        let after = missing_fields(WizardStep::Education, &doc);
        assert_eq!(after.len(), 18);
        let removed: Vec<_> = before.iter().filter(|l| !after.contains(l)).collect();
        assert_eq!(removed, vec!["College: Stream"]);
    }

    #[test]
    fn test_step3_requires_status() {
        let mut doc = CvDocument::default();
        assert_eq!(
            missing_fields(WizardStep::UsmleScores, &doc),
            labels(&["USMLE Step 1 Status"])
        );
        doc.usmle_scores.step1_status = Some(Step1Status::NotTaken);
        assert!(missing_fields(WizardStep::UsmleScores, &doc).is_empty());
    }

    #[test]
    fn test_blank_step1_status_from_form() {
        let doc: CvDocument =
            serde_json::from_value(serde_json::json!({ "usmleScores": { "step1Status": "" } }))
                .unwrap();
        assert_eq!(
            missing_fields(WizardStep::UsmleScores, &doc),
            labels(&["USMLE Step 1 Status"])
        );
        assert!(!crate::cv::completion::completed_steps(&doc).contains(&WizardStep::UsmleScores));
    }

    #[test]
    fn test_step4_empty_list() {
        let doc = CvDocument::default();
        assert_eq!(
            missing_fields(WizardStep::UsClinicalExperience, &doc),
            labels(&["At least one US Clinical Experience"])
        );
    }

    #[test]
    fn test_step4_current_waives_end_date() {
        let mut doc = CvDocument::default();
        doc.us_clinical_experience.list.push(ClinicalExperience {
            institution: "Hosp".into(),
            role: "Intern".into(),
            start_date: "2024-01-01".into(),
            current: true,
            ..Default::default()
        });
        assert!(missing_fields(WizardStep::UsClinicalExperience, &doc).is_empty());
    }

    #[test]
    fn test_step4_labels_use_one_based_index_in_order() {
        let mut doc = CvDocument::default();
        doc.us_clinical_experience.list.push(ClinicalExperience {
            institution: "Hosp".into(),
            role: "Extern".into(),
            start_date: "2023-01-01".into(),
            end_date: "2023-06-01".into(),
            ..Default::default()
        });
        doc.us_clinical_experience.list.push(ClinicalExperience {
            role: "Observer".into(),
            ..Default::default()
        });
        assert_eq!(
            missing_fields(WizardStep::UsClinicalExperience, &doc),
            labels(&[
                "Experience 2: Institution",
                "Experience 2: Start Date",
                "Experience 2: End Date"
            ])
        );
    }

    #[test]
    fn test_step5_skills() {
        let mut doc = CvDocument::default();
        doc.skills.skills_list = " \n".into();
        assert_eq!(missing_fields(WizardStep::Skills, &doc), labels(&["Skills"]));
        doc.skills.skills_list = "Suturing".into();
        assert!(missing_fields(WizardStep::Skills, &doc).is_empty());
    }

    #[test]
    fn test_later_steps_always_pass() {
        let mut doc = CvDocument::default();
        doc.publications.push(Publication::default());
        for step in WizardStep::ALL.iter().filter(|s| !s.is_gated()) {
            assert!(missing_fields(*step, &CvDocument::default()).is_empty());
            assert!(missing_fields(*step, &doc).is_empty());
        }
    }

    #[test]
    fn test_message_lists_five_and_remainder() {
        let missing = missing_fields(WizardStep::Education, &CvDocument::default());
        let msg = missing_fields_message(&missing);
        assert_eq!(
            msg,
            "Please fill in the required fields: Schooling: School Name, Schooling: Board, \
             Schooling: City, Schooling: Country, Schooling: Passing Year and 14 more"
        );
    }

    #[test]
    fn test_message_without_remainder() {
        assert_eq!(
            missing_fields_message(&labels(&["USMLE Step 1 Status"])),
            "Please fill in the required fields: USMLE Step 1 Status"
        );
        assert_eq!(missing_fields_message(&[]), "");
    }
}
