//! Boolean findings
//!
//! A finding is "present" when its entry exists. Toggling a finding on creates
//! the coded entry with no value; toggling it off removes the entry and its
//! section reference.

use crate::error::Result;
use crate::record::Record;
use crate::registry::{self, EntryTemplate};
use tracing::trace;
use vitalis_models::{CodeableConcept, Coding, EntryId, Resource};

/// An entry template, optionally qualified by an outcome code.
///
/// Findings that share a code but differ in outcome (a procedure attempted
/// versus one that succeeded) are distinct findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingTemplate {
    pub entry: EntryTemplate,
    pub outcome: Option<Coding>,
}

impl FindingTemplate {
    pub fn new(entry: EntryTemplate) -> Self {
        Self {
            entry,
            outcome: None,
        }
    }

    pub fn with_outcome(mut self, outcome: Coding) -> Self {
        self.outcome = Some(outcome);
        self
    }

    fn matches(&self, resource: &Resource, subject: &str) -> bool {
        let entry = &self.entry;
        resource.kind() == entry.kind
            && resource.has_code(&entry.code)
            && resource.subject_reference() == Some(subject)
            && entry
                .category
                .as_ref()
                .and_then(Coding::code)
                .map_or(true, |category| resource.has_category(category))
            && self
                .outcome
                .as_ref()
                .and_then(Coding::code)
                .map_or(true, |outcome| resource.has_outcome(outcome))
    }
}

fn find(record: &Record, finding: &FindingTemplate, subject: &str) -> Option<EntryId> {
    record
        .section_entries(&finding.entry.section)
        .iter()
        .find(|id| {
            record
                .resource(id)
                .is_some_and(|r| finding.matches(r, subject))
        })
        .cloned()
}

/// True if the finding's entry exists in its section for the template's
/// subject (its role, else the section's default role).
///
/// An unrecognized section holds no entries, so the finding reads as absent.
pub fn entry_exists(record: &Record, finding: &FindingTemplate) -> bool {
    registry::default_subject(record, &finding.entry)
        .is_ok_and(|subject| find(record, finding, &subject).is_some())
}

/// Make the finding present or absent. Both directions are no-ops when the
/// record is already in the requested state.
pub fn update_entry(record: &mut Record, finding: &FindingTemplate, present: bool) -> Result<()> {
    let subject = registry::default_subject(record, &finding.entry)?;

    match (find(record, finding, &subject), present) {
        (None, true) => {
            let id = registry::create(record, &finding.entry, &subject)?;
            if let (Some(outcome), Some(resource)) = (&finding.outcome, record.resource_mut(&id)) {
                resource.outcome = Some(CodeableConcept::from_coding(outcome.clone()));
            }
        }
        (Some(id), false) => {
            registry::remove_entry(record, &id);
        }
        (existing, present) => {
            trace!(
                code = %finding.entry.code,
                present,
                exists = existing.is_some(),
                "finding already in requested state"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::SubjectRole;
    use vitalis_models::ResourceKind;

    const SNOMED: &str = "http://snomed.info/sct";

    fn gestational_diabetes() -> FindingTemplate {
        FindingTemplate::new(EntryTemplate::new(
            ResourceKind::Condition,
            "11687002",
            SNOMED,
            "Gestational diabetes",
            "http://example.org/StructureDefinition/Condition-gestational-diabetes",
            "medical-information",
        ))
    }

    fn version(outcome: &str) -> FindingTemplate {
        FindingTemplate::new(EntryTemplate::new(
            ResourceKind::Procedure,
            "240278000",
            SNOMED,
            "External cephalic version",
            "",
            "medical-information",
        ))
        .with_outcome(Coding::new(SNOMED, outcome, outcome))
    }

    #[test]
    fn test_toggle_closure() {
        let mut record = Record::with_default_config();
        let finding = gestational_diabetes();

        update_entry(&mut record, &finding, true).unwrap();
        assert!(entry_exists(&record, &finding));
        update_entry(&mut record, &finding, true).unwrap();
        assert_eq!(record.bundle().entry_count(), 1);

        update_entry(&mut record, &finding, false).unwrap();
        assert!(!entry_exists(&record, &finding));
        assert_eq!(record.bundle().entry_count(), 0);
        assert!(record.section_entries("medical-information").is_empty());
    }

    #[test]
    fn test_clearing_absent_finding_is_noop() {
        let mut record = Record::with_default_config();
        update_entry(&mut record, &gestational_diabetes(), false).unwrap();
        assert_eq!(record.bundle().entry_count(), 0);
        assert!(record.composition().section.is_empty());
    }

    #[test]
    fn test_created_finding_has_no_value() {
        let mut record = Record::with_default_config();
        let finding = gestational_diabetes();
        update_entry(&mut record, &finding, true).unwrap();

        let id = &record.section_entries("medical-information")[0];
        let resource = record.resource(id).unwrap();
        assert!(resource.value.is_none());
        assert_eq!(resource.kind(), ResourceKind::Condition);
    }

    #[test]
    fn test_outcome_qualifies_existence() {
        let mut record = Record::with_default_config();
        let succeeded = version("385669000");
        let failed = version("385671000");

        update_entry(&mut record, &succeeded, true).unwrap();
        assert!(entry_exists(&record, &succeeded));
        assert!(!entry_exists(&record, &failed));

        update_entry(&mut record, &failed, true).unwrap();
        assert_eq!(record.bundle().entry_count(), 2);

        update_entry(&mut record, &succeeded, false).unwrap();
        assert!(!entry_exists(&record, &succeeded));
        assert!(entry_exists(&record, &failed));
    }

    #[test]
    fn test_subjects_in_one_section_are_distinct() {
        let mut record = Record::with_default_config();
        let mother = gestational_diabetes();
        let mut father = gestational_diabetes();
        father.entry.subject = Some(SubjectRole::Father);

        update_entry(&mut record, &mother, true).unwrap();
        assert!(!entry_exists(&record, &father));

        update_entry(&mut record, &father, true).unwrap();
        assert_eq!(record.section_entries("medical-information").len(), 2);

        update_entry(&mut record, &father, false).unwrap();
        assert!(!entry_exists(&record, &father));
        assert!(entry_exists(&record, &mother));
        assert_eq!(record.bundle().entry_count(), 1);
    }

    #[test]
    fn test_kind_must_match() {
        let mut record = Record::with_default_config();
        let finding = gestational_diabetes();
        update_entry(&mut record, &finding, true).unwrap();

        let mut as_observation = finding.clone();
        as_observation.entry.kind = ResourceKind::Observation;
        assert!(!entry_exists(&record, &as_observation));
    }

    #[test]
    fn test_unknown_section() {
        let mut record = Record::with_default_config();
        let mut finding = gestational_diabetes();
        finding.entry.section = "nowhere".to_string();

        assert!(!entry_exists(&record, &finding));
        assert!(update_entry(&mut record, &finding, true).is_err());
    }
}
