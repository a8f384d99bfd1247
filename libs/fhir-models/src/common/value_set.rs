//! ValueSet model
//!
//! Only the expansion form is modelled: a flat list of codes with their
//! systems and displays, which is what code lookups need.

use super::complex::PublicationStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// ValueSet resource
///
/// A set of codes drawn from one or more code systems.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueSet {
    /// Resource type - always "ValueSet"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Canonical identifier
    pub url: String,

    /// Name (computer friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Name (human friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Publication status
    #[serde(default)]
    pub status: PublicationStatus,

    /// Used when the value set is "expanded"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion: Option<ValueSetExpansion>,

    /// Additional content
    #[serde(flatten)]
    pub additional: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "ValueSet".to_string()
}

/// Expansion of the value set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValueSetExpansion {
    /// Time valueset expansion was generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Codes in the value set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<ValueSetExpansionContains>,
}

/// Codes in an expansion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValueSetExpansionContains {
    /// System value for the code
    pub system: String,

    /// Code
    pub code: String,

    /// User display for the concept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl ValueSet {
    /// Create a new ValueSet with minimal required fields
    pub fn new(url: impl Into<String>, status: PublicationStatus) -> Self {
        Self {
            resource_type: "ValueSet".to_string(),
            id: None,
            url: url.into(),
            name: None,
            title: None,
            status,
            expansion: None,
            additional: HashMap::new(),
        }
    }

    /// Build an expanded value set from `(code, system, display)` rows
    pub fn from_concepts<'a>(
        url: impl Into<String>,
        concepts: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> Self {
        let mut value_set = Self::new(url, PublicationStatus::Active);
        value_set.expansion = Some(ValueSetExpansion {
            timestamp: None,
            contains: concepts
                .into_iter()
                .map(|(code, system, display)| ValueSetExpansionContains {
                    system: system.to_string(),
                    code: code.to_string(),
                    display: Some(display.to_string()),
                })
                .collect(),
        });
        value_set
    }

    /// Codes in the expansion, empty when the set is not expanded
    pub fn concepts(&self) -> &[ValueSetExpansionContains] {
        self.expansion
            .as_ref()
            .map(|e| e.contains.as_slice())
            .unwrap_or(&[])
    }

    /// Look up a code in the expansion
    pub fn lookup(&self, code: &str) -> Option<&ValueSetExpansionContains> {
        self.concepts().iter().find(|c| c.code == code)
    }
}
