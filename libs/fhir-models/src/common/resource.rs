//! Resource model
//!
//! A single version-agnostic shape covers every resource kind a vital-records
//! document carries. Kind-specific content that has no dedicated field lands in
//! `additional`.

use super::complex::{CodeableConcept, Extension, Reference, Value, ValueElement};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

/// Kind of resource held in a bundle entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Observation,
    Procedure,
    Condition,
    Practitioner,
    Location,
    /// Person role for the mother and the child
    Patient,
    /// Person role for the father
    RelatedPerson,
    Coverage,
    Encounter,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Observation => "Observation",
            ResourceKind::Procedure => "Procedure",
            ResourceKind::Condition => "Condition",
            ResourceKind::Practitioner => "Practitioner",
            ResourceKind::Location => "Location",
            ResourceKind::Patient => "Patient",
            ResourceKind::RelatedPerson => "RelatedPerson",
            ResourceKind::Coverage => "Coverage",
            ResourceKind::Encounter => "Encounter",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Meta {
    /// Profiles this resource claims to conform to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,
}

/// A named sub-value of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub code: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueElement>,
}

impl Component {
    pub fn new(code: CodeableConcept, value: Value) -> Self {
        Self {
            code,
            value: Some(ValueElement::new(value)),
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref().and_then(|v| v.value.as_ref())
    }
}

/// A typed clinical object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub resource_type: ResourceKind,

    /// Logical id, equal to the owning entry's local id
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus: Vec<Reference>,

    /// Observation.value[x], Condition/Procedure payloads, Patient.birthDate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueElement>,

    /// Observation.effective[x], Procedure.performed[x], Condition.onset[x]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective: Option<ValueElement>,

    /// Procedure.outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<Component>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub additional: HashMap<String, JsonValue>,
}

impl Resource {
    /// Create an empty resource of the given kind with no id
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            resource_type: kind,
            id: String::new(),
            meta: None,
            status: None,
            category: Vec::new(),
            code: None,
            subject: None,
            focus: Vec::new(),
            value: None,
            effective: None,
            outcome: None,
            component: Vec::new(),
            extension: Vec::new(),
            additional: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.resource_type
    }

    /// `ResourceType/id`, the form other resources use to point at this one
    pub fn local_reference(&self) -> String {
        format!("{}/{}", self.resource_type, self.id)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_ref().is_some_and(|c| c.has_code(code))
    }

    pub fn has_category(&self, code: &str) -> bool {
        self.category.iter().any(|c| c.has_code(code))
    }

    pub fn subject_reference(&self) -> Option<&str> {
        self.subject.as_ref().and_then(Reference::reference)
    }

    pub fn has_outcome(&self, code: &str) -> bool {
        self.outcome.as_ref().is_some_and(|c| c.has_code(code))
    }

    /// Record a profile claim, ignoring duplicates
    pub fn assert_profile(&mut self, profile: impl Into<String>) {
        let profile = profile.into();
        let meta = self.meta.get_or_insert_with(Meta::default);
        if !meta.profile.contains(&profile) {
            meta.profile.push(profile);
        }
    }

    pub fn profiles(&self) -> &[String] {
        self.meta.as_ref().map(|m| m.profile.as_slice()).unwrap_or(&[])
    }

    /// The current value payload, if any
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref().and_then(|v| v.value.as_ref())
    }

    /// Replace the value payload, keeping any extensions on the value element
    pub fn set_value(&mut self, value: Value) {
        self.value_element_mut().replace_value(Some(value));
    }

    /// Clear the value payload, keeping any extensions on the value element
    pub fn clear_value(&mut self) {
        if let Some(element) = self.value.as_mut() {
            element.value = None;
            if element.is_empty() {
                self.value = None;
            }
        }
    }

    /// The value element, created as a placeholder if it does not exist yet
    pub fn value_element_mut(&mut self) -> &mut ValueElement {
        self.value.get_or_insert_with(ValueElement::placeholder)
    }

    pub fn component(&self, code: &str) -> Option<&Component> {
        self.component.iter().find(|c| c.code.has_code(code))
    }

    /// Remove every component coded `code`, returning how many were dropped
    pub fn remove_components(&mut self, code: &str) -> usize {
        let before = self.component.len();
        self.component.retain(|c| !c.code.has_code(code));
        before - self.component.len()
    }
}
