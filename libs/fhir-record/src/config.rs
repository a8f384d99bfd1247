//! Configuration for the record engine
//!
//! The recognized section catalogue, the code tables used by the helper layer
//! and the component catalogues are data, not code. They are loaded once and
//! shared by every record through an `Arc<RecordConfig>`.

use crate::error::{Error, Result};
use crate::partial_date::PartialDateCodec;
use crate::subject::SubjectRole;
use crate::tabulated::ComponentCatalogue;
use crate::urls::{
    BYPASS_EDIT_FLAG_URL, EDIT_FLAGS_SYSTEM, LOINC_SYSTEM, NULL_FLAVOR_SYSTEM,
    PARTIAL_DATE_TIME_URL, RACE_SYSTEM, YES_NO_SYSTEM,
};
use phf::phf_map;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use vitalis_models::{CodeableConcept, Coding, Section, ValueSet};

/// `(system, display)` for a code in a built-in table
type ConceptRow = (&'static str, &'static str);

static EDIT_FLAGS: phf::Map<&'static str, ConceptRow> = phf_map! {
    "0" => (EDIT_FLAGS_SYSTEM, "Edit Passed"),
    "1" => (EDIT_FLAGS_SYSTEM, "Edit Failed, Data Queried, and Verified"),
    "2" => (EDIT_FLAGS_SYSTEM, "Edit Failed, Data Queried, but not Verified"),
    "1off" => (EDIT_FLAGS_SYSTEM, "Off"),
};

static YES_NO_UNKNOWN: phf::Map<&'static str, ConceptRow> = phf_map! {
    "Y" => (YES_NO_SYSTEM, "Yes"),
    "N" => (YES_NO_SYSTEM, "No"),
    "UNK" => (NULL_FLAVOR_SYSTEM, "unknown"),
};

static RACE: phf::Map<&'static str, ConceptRow> = phf_map! {
    "2106-3" => (RACE_SYSTEM, "White"),
    "2054-5" => (RACE_SYSTEM, "Black or African American"),
    "1002-5" => (RACE_SYSTEM, "American Indian or Alaska Native"),
    "2028-9" => (RACE_SYSTEM, "Asian"),
    "2076-8" => (RACE_SYSTEM, "Native Hawaiian or Other Pacific Islander"),
    "2131-1" => (RACE_SYSTEM, "Other Race"),
};

/// A recognized composition section
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionDefinition {
    pub id: String,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub system: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Subject used when a caller does not name one
    #[serde(default = "default_subject")]
    pub default_subject: SubjectRole,
}

impl SectionDefinition {
    fn new(id: &str, code: &str, title: &str, default_subject: SubjectRole) -> Self {
        Self {
            id: id.to_string(),
            code: Some(code.to_string()),
            system: Some(LOINC_SYSTEM.to_string()),
            title: Some(title.to_string()),
            default_subject,
        }
    }

    /// An empty composition section for this definition
    pub fn to_section(&self) -> Section {
        let mut section = Section::new(self.id.clone());
        section.title = self.title.clone();
        section.code = self.code.as_ref().map(|code| {
            CodeableConcept::from_coding(Coding::new(
                self.system.clone().unwrap_or_default(),
                code.clone(),
                self.title.clone().unwrap_or_default(),
            ))
        });
        section
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordConfig {
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionDefinition>,

    /// Code tables for the helper layer, keyed by name
    #[serde(default = "default_value_sets")]
    pub value_sets: BTreeMap<String, ValueSet>,

    /// Component catalogues for tabulated entries, keyed by name
    #[serde(default = "default_catalogues")]
    pub catalogues: BTreeMap<String, ComponentCatalogue>,

    #[serde(default = "default_edit_flag_url")]
    pub edit_flag_url: String,

    #[serde(default = "default_partial_date_url")]
    pub partial_date_url: String,

    #[serde(default)]
    pub composition_title: Option<String>,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            value_sets: default_value_sets(),
            catalogues: default_catalogues(),
            edit_flag_url: default_edit_flag_url(),
            partial_date_url: default_partial_date_url(),
            composition_title: None,
        }
    }
}

impl RecordConfig {
    /// Parse and validate configuration supplied as JSON text
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration supplied as a JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            if section.id.trim().is_empty() {
                return Err(Error::InvalidConfig("section id must not be empty".into()));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
        }
        for (name, catalogue) in &self.catalogues {
            catalogue
                .validate()
                .map_err(|e| Error::InvalidConfig(format!("catalogue '{name}': {e}")))?;
        }
        Ok(())
    }

    pub fn section(&self, id: &str) -> Option<&SectionDefinition> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Like [`RecordConfig::section`], but an unrecognized id is an error
    pub fn require_section(&self, id: &str) -> Result<&SectionDefinition> {
        self.section(id)
            .ok_or_else(|| Error::UnknownSection(id.to_string()))
    }

    pub fn value_set(&self, name: &str) -> Result<&ValueSet> {
        self.value_sets
            .get(name)
            .ok_or_else(|| Error::UnknownValueSet(name.to_string()))
    }

    /// Codec for date containers under the configured partial-date url
    pub fn partial_date_codec(&self) -> PartialDateCodec {
        PartialDateCodec::new(self.partial_date_url.clone())
    }

    pub fn catalogue(&self, name: &str) -> Result<&ComponentCatalogue> {
        self.catalogues
            .get(name)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown catalogue '{name}'")))
    }
}

fn default_subject() -> SubjectRole {
    SubjectRole::Child
}

fn default_edit_flag_url() -> String {
    BYPASS_EDIT_FLAG_URL.to_string()
}

fn default_partial_date_url() -> String {
    PARTIAL_DATE_TIME_URL.to_string()
}

fn default_sections() -> Vec<SectionDefinition> {
    vec![
        SectionDefinition::new("mother-prenatal", "57073-9", "Prenatal", SubjectRole::Mother),
        SectionDefinition::new(
            "medical-information",
            "55752-0",
            "Medical information",
            SubjectRole::Mother,
        ),
        SectionDefinition::new(
            "newborn-information",
            "57075-4",
            "Newborn information",
            SubjectRole::Child,
        ),
        SectionDefinition::new(
            "mother-information",
            "92014-0",
            "Maternal information",
            SubjectRole::Mother,
        ),
        SectionDefinition::new(
            "father-information",
            "92013-2",
            "Paternal information",
            SubjectRole::Father,
        ),
    ]
}

fn value_set_from_table(url: &str, table: &phf::Map<&'static str, ConceptRow>) -> ValueSet {
    let mut rows: Vec<(&str, &str, &str)> = table
        .entries()
        .map(|(code, (system, display))| (*code, *system, *display))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    ValueSet::from_concepts(url, rows)
}

fn default_value_sets() -> BTreeMap<String, ValueSet> {
    let base = "http://hl7.org/fhir/us/vr-common-library/ValueSet";
    BTreeMap::from([
        (
            "edit-flags".to_string(),
            value_set_from_table(&format!("{base}/ValueSet-vr-edit-flags"), &EDIT_FLAGS),
        ),
        (
            "yes-no-unknown".to_string(),
            value_set_from_table(&format!("{base}/ValueSet-yes-no-unknown-vr"), &YES_NO_UNKNOWN),
        ),
        (
            "race".to_string(),
            value_set_from_table(&format!("{base}/ValueSet-race-vr"), &RACE),
        ),
    ])
}

fn default_catalogues() -> BTreeMap<String, ComponentCatalogue> {
    BTreeMap::from([("race".to_string(), ComponentCatalogue::race())])
}
