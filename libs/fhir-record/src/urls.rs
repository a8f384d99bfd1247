//! Canonical URLs and code systems used by the engine

pub const PARTIAL_DATE_TIME_URL: &str =
    "http://hl7.org/fhir/us/vr-common-library/StructureDefinition/Extension-partial-date-time-vr";

pub const DATE_YEAR_URL: &str = "date-year";
pub const DATE_MONTH_URL: &str = "date-month";
pub const DATE_DAY_URL: &str = "date-day";
pub const DATE_TIME_URL: &str = "date-time";

pub const DATA_ABSENT_REASON_URL: &str =
    "http://hl7.org/fhir/StructureDefinition/data-absent-reason";

pub const BYPASS_EDIT_FLAG_URL: &str =
    "http://hl7.org/fhir/us/vr-common-library/StructureDefinition/BypassEditFlag";

pub const EDIT_FLAGS_SYSTEM: &str =
    "http://hl7.org/fhir/us/vr-common-library/CodeSystem/CodeSystem-vr-edit-flags";

pub const NULL_FLAVOR_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v3-NullFlavor";

pub const YES_NO_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v2-0136";

pub const RACE_SYSTEM: &str = "urn:oid:2.16.840.1.113883.6.238";

pub const COMPONENT_SYSTEM: &str =
    "http://hl7.org/fhir/us/vr-common-library/CodeSystem/codesystem-vr-component";

pub const LOINC_SYSTEM: &str = "http://loinc.org";

pub const OBSERVATION_CATEGORY_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/observation-category";
