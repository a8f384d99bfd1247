//! Complex types and shared data structures
//!
//! This module contains enums and structs that are reused across resources.
//! No validation - just data representation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Publication status of a conformance resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Active,
    Retired,
    Unknown,
}

/// Coding - a reference to a code defined by a terminology system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected: Option<bool>,
}

impl Coding {
    /// Create a coding from a system, code and display triple
    pub fn new(
        system: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            system: Some(system.into()),
            version: None,
            code: Some(code.into()),
            display: Some(display.into()),
            user_selected: None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }
}

/// CodeableConcept - a coded value with optional free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Create a concept carrying a single coding
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }

    pub fn first_coding(&self) -> Option<&Coding> {
        self.coding.first()
    }

    /// Code of the first coding, if any
    pub fn code(&self) -> Option<&str> {
        self.first_coding().and_then(Coding::code)
    }

    /// True if any coding carries `code`
    pub fn has_code(&self, code: &str) -> bool {
        self.coding.iter().any(|c| c.code() == Some(code))
    }

    /// True if any coding carries `code`, restricted to `system` when given
    pub fn matches(&self, system: Option<&str>, code: &str) -> bool {
        self.coding
            .iter()
            .any(|c| c.code() == Some(code) && system.map_or(true, |s| c.system() == Some(s)))
    }
}

/// Reference from one resource to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            display: None,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// Quantity - a measured amount with a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Quantity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Quantity {
    /// Create a UCUM quantity where the unit and code are the same symbol
    pub fn ucum(value: Decimal, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        Self {
            value: Some(value),
            unit: Some(unit.clone()),
            system: Some("http://unitsofmeasure.org".to_string()),
            code: Some(unit),
        }
    }
}

/// The payload of a value element.
///
/// Variants serialize under their `value[x]` choice name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[serde(rename = "valueBoolean")]
    Boolean(bool),
    #[serde(rename = "valueInteger")]
    Integer(i64),
    #[serde(rename = "valueUnsignedInt")]
    UnsignedInt(u32),
    #[serde(rename = "valueDecimal")]
    Decimal(Decimal),
    #[serde(rename = "valueString")]
    String(String),
    #[serde(rename = "valueCode")]
    Code(String),
    #[serde(rename = "valueDate")]
    Date(String),
    #[serde(rename = "valueDateTime")]
    DateTime(String),
    #[serde(rename = "valueTime")]
    Time(String),
    #[serde(rename = "valueQuantity")]
    Quantity(Quantity),
    #[serde(rename = "valueCoding")]
    Coding(Coding),
    #[serde(rename = "valueCodeableConcept")]
    CodeableConcept(CodeableConcept),
    #[serde(rename = "valueReference")]
    Reference(Reference),
}

impl Value {
    /// The `value[x]` type suffix of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::UnsignedInt(_) => "unsignedInt",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Code(_) => "code",
            Value::Date(_) => "date",
            Value::DateTime(_) => "dateTime",
            Value::Time(_) => "time",
            Value::Quantity(_) => "Quantity",
            Value::Coding(_) => "Coding",
            Value::CodeableConcept(_) => "CodeableConcept",
            Value::Reference(_) => "Reference",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::UnsignedInt(u) => Some(i64::from(*u)),
            _ => None,
        }
    }

    pub fn as_unsigned_int(&self) -> Option<u32> {
        match self {
            Value::UnsignedInt(u) => Some(*u),
            Value::Integer(i) => u32::try_from(*i).ok(),
            _ => None,
        }
    }

    /// String-like payloads: string, code, date, dateTime and time
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s)
            | Value::Code(s)
            | Value::Date(s)
            | Value::DateTime(s)
            | Value::Time(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Value::Quantity(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_codeable_concept(&self) -> Option<&CodeableConcept> {
        match self {
            Value::CodeableConcept(c) => Some(c),
            _ => None,
        }
    }
}

/// An element that may hold a value and its own element-level extensions.
///
/// An element with no value and no extensions is a placeholder: it exists so
/// that metadata can be attached before the value itself is known.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueElement {
    #[serde(flatten)]
    pub value: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

impl ValueElement {
    pub fn new(value: Value) -> Self {
        Self {
            value: Some(value),
            extension: Vec::new(),
        }
    }

    /// An element with neither value nor extensions
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.extension.is_empty()
    }

    /// Replace the payload, keeping element-level extensions
    pub fn replace_value(&mut self, value: Option<Value>) -> Option<Value> {
        std::mem::replace(&mut self.value, value)
    }

    pub fn find_extension(&self, url: &str) -> Option<&Extension> {
        self.extension.iter().find(|e| e.url == url)
    }

    /// Remove every extension with `url`, returning how many were dropped
    pub fn remove_extensions(&mut self, url: &str) -> usize {
        let before = self.extension.len();
        self.extension.retain(|e| e.url != url);
        before - self.extension.len()
    }
}

/// Extension - a URL-keyed, nestable key/value attachment
///
/// Children are disambiguated by `url`, not by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub url: String,

    #[serde(flatten)]
    pub value: Option<Value>,

    /// Extensions on the value itself (`_value[x]`)
    #[serde(rename = "_value", default, skip_serializing_if = "Vec::is_empty")]
    pub value_extension: Vec<Extension>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

impl Extension {
    /// An extension with neither value nor children
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            value: None,
            value_extension: Vec::new(),
            extension: Vec::new(),
        }
    }

    pub fn with_value(url: impl Into<String>, value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::new(url)
        }
    }

    /// First child extension with `url`
    pub fn child(&self, url: &str) -> Option<&Extension> {
        self.extension.iter().find(|e| e.url == url)
    }

    /// Insert `child`, replacing any children that share its url
    pub fn set_child(&mut self, child: Extension) {
        self.extension.retain(|e| e.url != child.url);
        self.extension.push(child);
    }

    pub fn remove_child(&mut self, url: &str) -> bool {
        let before = self.extension.len();
        self.extension.retain(|e| e.url != url);
        before != self.extension.len()
    }
}
