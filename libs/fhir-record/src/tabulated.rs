//! Tabulated multi-component values
//!
//! A fixed catalogue of named sub-values stored as components of one shared
//! entry. Boolean categories round-trip as `"Y"`/`"N"`; literal categories
//! carry free text. Components that were never captured are omitted on read.

use crate::error::{Error, Result};
use crate::urls::{COMPONENT_SYSTEM, RACE_SYSTEM};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use vitalis_models::{CodeableConcept, Coding, Component, Resource, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Captured as a boolean, exchanged as `"Y"`/`"N"`
    Boolean,
    /// Free text
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItem {
    pub code: String,
    pub system: String,
    #[serde(default)]
    pub display: String,
    pub kind: ComponentKind,
}

impl CatalogueItem {
    fn new(code: &str, system: &str, display: &str, kind: ComponentKind) -> Self {
        Self {
            code: code.to_string(),
            system: system.to_string(),
            display: display.to_string(),
            kind,
        }
    }

    fn concept(&self) -> CodeableConcept {
        CodeableConcept::from_coding(Coding::new(
            self.system.clone(),
            self.code.clone(),
            self.display.clone(),
        ))
    }
}

/// Ordered catalogue of the components one entry may carry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentCatalogue {
    pub items: Vec<CatalogueItem>,
}

impl ComponentCatalogue {
    pub fn new(items: Vec<CatalogueItem>) -> Self {
        Self { items }
    }

    /// Race categories: one boolean per category plus the literal write-ins
    pub fn race() -> Self {
        use ComponentKind::{Boolean, Literal};
        Self::new(vec![
            CatalogueItem::new("2106-3", RACE_SYSTEM, "White", Boolean),
            CatalogueItem::new("2054-5", RACE_SYSTEM, "Black or African American", Boolean),
            CatalogueItem::new("1002-5", RACE_SYSTEM, "American Indian or Alaska Native", Boolean),
            CatalogueItem::new("2028-9", RACE_SYSTEM, "Asian", Boolean),
            CatalogueItem::new(
                "2076-8",
                RACE_SYSTEM,
                "Native Hawaiian or Other Pacific Islander",
                Boolean,
            ),
            CatalogueItem::new("2131-1", RACE_SYSTEM, "Other Race", Boolean),
            CatalogueItem::new(
                "AmericanIndianAlaskanNativeLiteral1",
                COMPONENT_SYSTEM,
                "First American Indian or Alaska Native Literal",
                Literal,
            ),
            CatalogueItem::new(
                "AmericanIndianAlaskanNativeLiteral2",
                COMPONENT_SYSTEM,
                "Second American Indian or Alaska Native Literal",
                Literal,
            ),
            CatalogueItem::new(
                "OtherAsianLiteral1",
                COMPONENT_SYSTEM,
                "First Other Asian Literal",
                Literal,
            ),
            CatalogueItem::new(
                "OtherRaceLiteral1",
                COMPONENT_SYSTEM,
                "First Other Race Literal",
                Literal,
            ),
        ])
    }

    pub fn get(&self, code: &str) -> Option<&CatalogueItem> {
        self.items.iter().find(|i| i.code == code)
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.code.is_empty() {
                return Err("component code must not be empty".to_string());
            }
            if !seen.insert(item.code.as_str()) {
                return Err(format!("duplicate component code '{}'", item.code));
            }
        }
        Ok(())
    }
}

/// Captured `(componentCode, value)` pairs in catalogue order.
pub fn get_all(resource: &Resource, catalogue: &ComponentCatalogue) -> Vec<(String, String)> {
    catalogue
        .items
        .iter()
        .filter_map(|item| {
            let value = resource.component(&item.code)?.value()?;
            let rendered = match item.kind {
                ComponentKind::Boolean => match value.as_bool()? {
                    true => "Y".to_string(),
                    false => "N".to_string(),
                },
                ComponentKind::Literal => value.as_str()?.to_string(),
            };
            Some((item.code.clone(), rendered))
        })
        .collect()
}

/// Replace the components named in `pairs`.
///
/// Every pair is checked before anything is written, so an invalid pair leaves
/// the resource untouched.
pub fn set_all<C, V>(
    resource: &mut Resource,
    pairs: &[(C, V)],
    catalogue: &ComponentCatalogue,
) -> Result<()>
where
    C: AsRef<str>,
    V: AsRef<str>,
{
    let mut staged = Vec::with_capacity(pairs.len());
    for (code, raw) in pairs {
        let (code, raw) = (code.as_ref(), raw.as_ref());
        let item = catalogue
            .get(code)
            .ok_or_else(|| Error::UnknownComponent(code.to_string()))?;
        let value = match item.kind {
            ComponentKind::Boolean => match raw {
                "Y" => Value::Boolean(true),
                "N" => Value::Boolean(false),
                _ => {
                    return Err(Error::InvalidComponentValue {
                        code: code.to_string(),
                        value: raw.to_string(),
                    })
                }
            },
            ComponentKind::Literal => Value::String(raw.to_string()),
        };
        staged.push((item, value));
    }

    for (item, value) in staged {
        resource.remove_components(&item.code);
        resource.component.push(Component::new(item.concept(), value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalis_models::ResourceKind;

    fn race_entry() -> Resource {
        Resource::new(ResourceKind::Observation)
    }

    #[test]
    fn test_single_component_round_trip() {
        let catalogue = ComponentCatalogue::race();
        let mut resource = race_entry();

        set_all(&mut resource, &[("2106-3", "Y")], &catalogue).unwrap();
        assert_eq!(
            get_all(&resource, &catalogue),
            vec![("2106-3".to_string(), "Y".to_string())]
        );
    }

    #[test]
    fn test_results_follow_catalogue_order() {
        let catalogue = ComponentCatalogue::race();
        let mut resource = race_entry();

        set_all(
            &mut resource,
            &[("OtherRaceLiteral1", "Hmong"), ("2028-9", "N"), ("2106-3", "Y")],
            &catalogue,
        )
        .unwrap();

        let codes: Vec<String> = get_all(&resource, &catalogue)
            .into_iter()
            .map(|(code, _)| code)
            .collect();
        assert_eq!(codes, vec!["2106-3", "2028-9", "OtherRaceLiteral1"]);
    }

    #[test]
    fn test_resetting_replaces_component() {
        let catalogue = ComponentCatalogue::race();
        let mut resource = race_entry();

        set_all(&mut resource, &[("2054-5", "Y")], &catalogue).unwrap();
        set_all(&mut resource, &[("2054-5", "N")], &catalogue).unwrap();

        assert_eq!(resource.component.len(), 1);
        assert_eq!(
            get_all(&resource, &catalogue),
            vec![("2054-5".to_string(), "N".to_string())]
        );
    }

    #[test]
    fn test_boolean_component_rejects_other_values() {
        let catalogue = ComponentCatalogue::race();
        let mut resource = race_entry();

        let err = set_all(&mut resource, &[("2106-3", "yes")], &catalogue).unwrap_err();
        assert!(matches!(err, Error::InvalidComponentValue { .. }));
    }

    #[test]
    fn test_unknown_component_leaves_resource_untouched() {
        let catalogue = ComponentCatalogue::race();
        let mut resource = race_entry();

        let err = set_all(
            &mut resource,
            &[("2106-3", "Y"), ("9999-9", "Y")],
            &catalogue,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownComponent(code) if code == "9999-9"));
        assert!(resource.component.is_empty());
    }

    #[test]
    fn test_literal_accepts_any_text() {
        let catalogue = ComponentCatalogue::race();
        let mut resource = race_entry();

        set_all(&mut resource, &[("OtherAsianLiteral1", "")], &catalogue).unwrap();
        assert_eq!(
            get_all(&resource, &catalogue),
            vec![("OtherAsianLiteral1".to_string(), String::new())]
        );
    }

    #[test]
    fn test_catalogue_validation_rejects_duplicates() {
        let item = CatalogueItem::new("a", "sys", "A", ComponentKind::Boolean);
        let catalogue = ComponentCatalogue::new(vec![item.clone(), item]);
        assert!(catalogue.validate().is_err());
    }
}
