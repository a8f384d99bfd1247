#![allow(dead_code)]

use std::sync::{Arc, Once, OnceLock};
use tracing_subscriber::EnvFilter;
use vitalis_models::{Coding, ResourceKind};
use vitalis_record::urls::LOINC_SYSTEM;
use vitalis_record::{EntryTemplate, FindingTemplate, Record, RecordConfig};

static TRACING: Once = Once::new();
static CONFIG: OnceLock<Arc<RecordConfig>> = OnceLock::new();

const SNOMED: &str = "http://snomed.info/sct";

/// Route engine logs to the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn config() -> Arc<RecordConfig> {
    CONFIG
        .get_or_init(|| Arc::new(RecordConfig::default()))
        .clone()
}

pub fn record() -> Record {
    init_tracing();
    Record::new(config())
}

pub fn birth_weight() -> EntryTemplate {
    EntryTemplate::observation(
        "8339-4",
        LOINC_SYSTEM,
        "Birth weight",
        "http://hl7.org/fhir/us/bfdr/StructureDefinition/Observation-birth-weight",
        "newborn-information",
    )
    .with_observation_category("vital-signs")
}

pub fn date_of_last_menses() -> EntryTemplate {
    EntryTemplate::observation(
        "8665-2",
        LOINC_SYSTEM,
        "Date last menstrual period",
        "http://hl7.org/fhir/us/bfdr/StructureDefinition/Observation-last-menstrual-period",
        "mother-prenatal",
    )
}

pub fn race(subject_section: &str) -> EntryTemplate {
    EntryTemplate::observation(
        "huminputrace",
        "http://hl7.org/fhir/us/vr-common-library/CodeSystem/codesystem-local-observation-codes-vr",
        "Race",
        "http://hl7.org/fhir/us/vr-common-library/StructureDefinition/Observation-input-race-and-ethnicity-vr",
        subject_section,
    )
}

pub fn eclampsia() -> FindingTemplate {
    FindingTemplate::new(EntryTemplate::new(
        ResourceKind::Condition,
        "15938005",
        SNOMED,
        "Eclampsia",
        "http://hl7.org/fhir/us/bfdr/StructureDefinition/Condition-eclampsia-hypertension",
        "medical-information",
    ))
}

pub fn cephalic_version(outcome: &str, display: &str) -> FindingTemplate {
    FindingTemplate::new(EntryTemplate::new(
        ResourceKind::Procedure,
        "240278000",
        SNOMED,
        "External cephalic version",
        "http://hl7.org/fhir/us/bfdr/StructureDefinition/Procedure-external-cephalic-version",
        "medical-information",
    ))
    .with_outcome(Coding::new(SNOMED, outcome, display))
}
