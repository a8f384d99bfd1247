//! Coded concept dictionaries
//!
//! Accessors exchange coded values as flat `{code, system, display, text}`
//! dictionaries. This module converts between that form and
//! [`CodeableConcept`], and implements the code-only helper layer that
//! resolves a bare code against a configured value set.

use crate::config::RecordConfig;
use crate::error::Result;
use crate::urls::NULL_FLAVOR_SYSTEM;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use vitalis_models::{CodeableConcept, Coding, Resource, Value, ValueSet};

pub const CODE: &str = "code";
pub const SYSTEM: &str = "system";
pub const DISPLAY: &str = "display";
pub const TEXT: &str = "text";

/// Code used when a helper value is not in its value set
pub const OTHER_CODE: &str = "OTH";

/// Flat dictionary form of a coded concept.
///
/// `code`, `system` and `display` are always present (possibly empty) in a
/// dictionary produced by [`to_dict`]; `text` only when the concept has text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeDictionary(BTreeMap<String, String>);

impl CodeDictionary {
    /// `{code: "", system: "", display: ""}`
    pub fn empty_concept() -> Self {
        Self::from_triple("", "", "")
    }

    pub fn from_triple(
        code: impl Into<String>,
        system: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        let mut dict = Self::default();
        dict.insert(CODE, code);
        dict.insert(SYSTEM, system);
        dict.insert(DISPLAY, display);
        dict
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.insert(TEXT, text);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn code(&self) -> &str {
        self.get(CODE).unwrap_or_default()
    }

    pub fn system(&self) -> &str {
        self.get(SYSTEM).unwrap_or_default()
    }

    pub fn display(&self) -> &str {
        self.get(DISPLAY).unwrap_or_default()
    }

    pub fn text(&self) -> Option<&str> {
        self.get(TEXT)
    }

    /// False when the code is missing or blank
    pub fn has_code(&self) -> bool {
        !self.code().trim().is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CodeDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Dictionary form of `concept`; an absent concept yields empty strings
pub fn to_dict(concept: Option<&CodeableConcept>) -> CodeDictionary {
    let Some(concept) = concept else {
        return CodeDictionary::empty_concept();
    };
    let coding = concept.first_coding();
    let field = |f: fn(&Coding) -> Option<&str>| coding.and_then(f).unwrap_or_default();

    let dict = CodeDictionary::from_triple(
        field(Coding::code),
        field(Coding::system),
        field(Coding::display),
    );
    match &concept.text {
        Some(text) => dict.with_text(text.clone()),
        None => dict,
    }
}

/// Single-coding concept built from `dict`.
///
/// Blank members are left off the coding rather than written as empty strings.
pub fn from_dict(dict: &CodeDictionary) -> CodeableConcept {
    let non_blank = |s: &str| (!s.is_empty()).then(|| s.to_string());
    CodeableConcept {
        coding: vec![Coding {
            system: non_blank(dict.system()),
            code: non_blank(dict.code()),
            display: non_blank(dict.display()),
            ..Coding::default()
        }],
        text: dict.text().map(str::to_string),
    }
}

/// Code of `dict`, or `None` when blank
pub fn helper_code(dict: &CodeDictionary) -> Option<String> {
    dict.has_code().then(|| dict.code().to_string())
}

/// Resolve a bare code against `value_set`.
///
/// An unrecognized code does not fail: it becomes the null-flavor "Other"
/// concept carrying the supplied value as text.
pub fn resolve_helper(value_set: &ValueSet, value: &str) -> CodeDictionary {
    match value_set.lookup(value) {
        Some(concept) => CodeDictionary::from_triple(
            concept.code.clone(),
            concept.system.clone(),
            concept.display.clone().unwrap_or_default(),
        ),
        None => {
            warn!(
                value,
                value_set = %value_set.url,
                "code not in value set, recording as Other"
            );
            CodeDictionary::from_triple(OTHER_CODE, NULL_FLAVOR_SYSTEM, "Other").with_text(value)
        }
    }
}

/// Helper setter: resolve `value` against the named value set from `config`
pub fn set_helper(config: &RecordConfig, value_set: &str, value: &str) -> Result<CodeDictionary> {
    Ok(resolve_helper(config.value_set(value_set)?, value))
}

/// The entry's coded value as a dictionary; empty when not coded
pub fn value_as_dict(resource: &Resource) -> CodeDictionary {
    to_dict(resource.value().and_then(Value::as_codeable_concept))
}

/// Store `dict` as the entry's coded value.
///
/// A dictionary with a blank code is ignored and leaves the value alone.
/// Returns whether the value was written.
pub fn set_value_from_dict(resource: &mut Resource, dict: &CodeDictionary) -> bool {
    if !dict.has_code() {
        return false;
    }
    resource.set_value(Value::CodeableConcept(from_dict(dict)));
    true
}
