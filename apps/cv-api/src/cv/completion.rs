use std::collections::BTreeSet;

use crate::cv::document::{is_filled, CvDocument};
use crate::cv::step::WizardStep;

/// Presence-based completion signal for one step.
///
/// Deliberately looser than `step_validation::missing_fields`: step 1 counts
/// as complete with just a name and an email. Steps 1 and 2 only need the
/// strings to be non-empty; steps 5 and 6 ignore surrounding whitespace.
pub fn is_step_complete(step: WizardStep, doc: &CvDocument) -> bool {
    match step {
        WizardStep::BasicDetails => {
            !doc.basic_details.full_name.is_empty() && !doc.basic_details.email.is_empty()
        }
        WizardStep::Education => {
            let g = &doc.education.graduation;
            !g.university_name.is_empty() && !g.country.is_empty()
        }
        WizardStep::UsmleScores => doc.usmle_scores.step1_status.is_some(),
        WizardStep::UsClinicalExperience => !doc.us_clinical_experience.list.is_empty(),
        WizardStep::Skills => is_filled(&doc.skills.skills_list),
        WizardStep::Achievements => is_filled(&doc.significant_achievements),
        WizardStep::Publications => !doc.publications.is_empty(),
        WizardStep::Conferences => !doc.conferences.is_empty(),
        WizardStep::EmrRcmTraining => {
            !doc.emr_rcm_training.emr_systems.is_empty() || doc.emr_rcm_training.rcm_training
        }
        WizardStep::Workshops => !doc.workshops.is_empty(),
        WizardStep::Review => true,
    }
}

/// Derives the set of completed steps from the full document.
pub fn completed_steps(doc: &CvDocument) -> BTreeSet<WizardStep> {
    WizardStep::ALL
        .into_iter()
        .filter(|step| is_step_complete(*step, doc))
        .collect()
}

/// Remembers which steps have already been reported complete so each step
/// fires its notification only once.
#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    reported: BTreeSet<WizardStep>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from steps a previous session already reported.
    pub fn seeded(completed: impl IntoIterator<Item = WizardStep>) -> Self {
        Self {
            reported: completed.into_iter().collect(),
        }
    }

    pub fn reported(&self) -> &BTreeSet<WizardStep> {
        &self.reported
    }

    /// Recomputes completion for `doc` and calls `on_completed` for every
    /// step reaching completion for the first time. Returns those steps.
    ///
    /// A step that loses its content and regains it later does not fire again.
    pub fn observe<F>(&mut self, doc: &CvDocument, mut on_completed: F) -> Vec<WizardStep>
    where
        F: FnMut(WizardStep),
    {
        let newly: Vec<WizardStep> = completed_steps(doc)
            .difference(&self.reported)
            .copied()
            .collect();
        for step in &newly {
            on_completed(*step);
            self.reported.insert(*step);
        }
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::document::{ClinicalExperience, Conference, Publication, Step1Status};

    fn numbers(set: &BTreeSet<WizardStep>) -> Vec<u8> {
        set.iter().map(|s| s.number()).collect()
    }

    #[test]
    fn test_empty_document_only_review() {
        assert_eq!(numbers(&completed_steps(&CvDocument::default())), vec![11]);
    }

    #[test]
    fn test_step1_needs_only_name_and_email() {
        let mut doc = CvDocument::default();
        doc.basic_details.full_name = "A".into();
        assert!(!is_step_complete(WizardStep::BasicDetails, &doc));
        doc.basic_details.email = "a@b.com".into();
        assert!(is_step_complete(WizardStep::BasicDetails, &doc));
    }

    #[test]
    fn test_whitespace_only_presence_rules() {
        let mut doc = CvDocument::default();
        doc.basic_details.full_name = " ".into();
        doc.basic_details.email = " ".into();
        doc.education.graduation.university_name = " ".into();
        doc.education.graduation.country = " ".into();
        doc.skills.skills_list = " ".into();
        doc.significant_achievements = "\t".into();
        assert_eq!(numbers(&completed_steps(&doc)), vec![1, 2, 11]);
    }

    #[test]
    fn test_step1_status_alone_completes_step3() {
        let mut doc = CvDocument::default();
        doc.usmle_scores.step1_status = Some(Step1Status::Pass);
        assert_eq!(numbers(&completed_steps(&doc)), vec![3, 11]);
    }

    #[test]
    fn test_clinical_experience_presence() {
        let mut doc = CvDocument::default();
        doc.us_clinical_experience.list.push(ClinicalExperience {
            institution: "Hosp".into(),
            role: "Intern".into(),
            start_date: "2024-01-01".into(),
            current: true,
            ..Default::default()
        });
        assert!(completed_steps(&doc).contains(&WizardStep::UsClinicalExperience));
    }

    #[test]
    fn test_emr_either_systems_or_rcm() {
        let mut doc = CvDocument::default();
        doc.emr_rcm_training.rcm_training = true;
        assert!(is_step_complete(WizardStep::EmrRcmTraining, &doc));

        let mut doc = CvDocument::default();
        doc.emr_rcm_training.emr_systems.insert("Epic".into());
        assert!(is_step_complete(WizardStep::EmrRcmTraining, &doc));
    }

    #[test]
    fn test_completion_is_deterministic() {
        let mut doc = CvDocument::default();
        doc.publications.push(Publication::default());
        doc.significant_achievements = "Gold medal".into();
        assert_eq!(completed_steps(&doc), completed_steps(&doc));
    }

    #[test]
    fn test_tracker_fires_once_per_step() {
        let mut tracker = CompletionTracker::new();
        let mut fired = Vec::new();

        let mut doc = CvDocument::default();
        doc.conferences.push(Conference::default());
        tracker.observe(&doc, |s| fired.push(s.number()));
        assert_eq!(fired, vec![8, 11]);

        fired.clear();
        doc.conferences.push(Conference::default());
        tracker.observe(&doc, |s| fired.push(s.number()));
        assert!(fired.is_empty());

        doc.skills.skills_list = "ACLS".into();
        let newly = tracker.observe(&doc, |s| fired.push(s.number()));
        assert_eq!(fired, vec![5]);
        assert_eq!(newly, vec![WizardStep::Skills]);
    }

    #[test]
    fn test_seeded_tracker_skips_known_steps() {
        let mut tracker = CompletionTracker::seeded([WizardStep::Review]);
        let newly = tracker.observe(&CvDocument::default(), |_| {});
        assert!(newly.is_empty());
    }

    #[test]
    fn test_tracker_does_not_refire_after_regression() {
        let mut tracker = CompletionTracker::seeded([WizardStep::Review]);
        let mut doc = CvDocument::default();
        doc.workshops.push(Default::default());
        assert_eq!(tracker.observe(&doc, |_| {}), vec![WizardStep::Workshops]);
        doc.workshops.clear();
        assert!(tracker.observe(&doc, |_| {}).is_empty());
        doc.workshops.push(Default::default());
        assert!(tracker.observe(&doc, |_| {}).is_empty());
        assert!(tracker.reported().contains(&WizardStep::Workshops));
    }
}
