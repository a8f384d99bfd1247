//! Composition model
//!
//! The document's table of contents. Sections hold entry handles, never
//! resources.

use super::bundle::EntryId;
use super::complex::{CodeableConcept, Reference};
use serde::{Deserialize, Serialize};

/// Composition resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Resource type - always "Composition"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub section: Vec<Section>,
}

fn default_resource_type() -> String {
    "Composition".to_string()
}

/// A topic grouping of entry references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section identifier, unique within the composition
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<EntryId>,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            code: None,
            entry: Vec::new(),
        }
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.entry.contains(id)
    }
}

impl Composition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            resource_type: "Composition".to_string(),
            id: id.into(),
            title: None,
            subject: None,
            section: Vec::new(),
        }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.section.iter().find(|s| s.id == id)
    }

    /// The section `id`, appended via `make` if the composition lacks it
    pub fn section_or_insert_with(
        &mut self,
        id: &str,
        make: impl FnOnce() -> Section,
    ) -> &mut Section {
        let position = match self.section.iter().position(|s| s.id == id) {
            Some(position) => position,
            None => {
                self.section.push(make());
                self.section.len() - 1
            }
        };
        &mut self.section[position]
    }

    /// Number of sections referencing `entry`
    pub fn reference_count(&self, entry: &EntryId) -> usize {
        self.section
            .iter()
            .map(|s| s.entry.iter().filter(|e| *e == entry).count())
            .sum()
    }

    /// Remove `entry` from every section that holds it
    pub fn remove_references(&mut self, entry: &EntryId) -> usize {
        let mut removed = 0;
        for section in &mut self.section {
            let before = section.entry.len();
            section.entry.retain(|e| e != entry);
            removed += before - section.entry.len();
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_or_insert_with_creates_once() {
        let mut composition = Composition::new("comp");
        composition
            .section_or_insert_with("newborn-information", || Section::new("newborn-information"))
            .entry
            .push(EntryId::from("a"));
        composition
            .section_or_insert_with("newborn-information", || Section::new("newborn-information"))
            .entry
            .push(EntryId::from("b"));

        assert_eq!(composition.section.len(), 1);
        assert_eq!(composition.section("newborn-information").unwrap().entry.len(), 2);
    }

    #[test]
    fn test_remove_references_from_all_sections() {
        let mut composition = Composition::new("comp");
        let id = EntryId::from("a");
        let mut first = Section::new("one");
        first.entry.push(id.clone());
        let mut second = Section::new("two");
        second.entry.push(id.clone());
        second.entry.push(EntryId::from("b"));
        composition.section = vec![first, second];

        assert_eq!(composition.reference_count(&id), 2);
        assert_eq!(composition.remove_references(&id), 2);
        assert_eq!(composition.reference_count(&id), 0);
        assert_eq!(composition.section("two").unwrap().entry.len(), 1);
    }
}
