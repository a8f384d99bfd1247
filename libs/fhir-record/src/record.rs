//! The record context
//!
//! A [`Record`] is one logical document: the bundle arena that owns every
//! resource, the composition that indexes them by section, and the identities
//! assigned to the people the document is about. Every engine operation takes
//! the record explicitly, so all mutations land in one place and are visible
//! to every later caller.

use crate::config::RecordConfig;
use crate::error::Result;
use crate::subject::SubjectRole;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use vitalis_models::{
    Bundle, BundleEntry, BundleType, Composition, EntryId, Reference, Resource,
};

#[derive(Debug, Clone)]
pub struct Record {
    config: Arc<RecordConfig>,
    pub(crate) bundle: Bundle,
    pub(crate) composition: Composition,
    subjects: BTreeMap<SubjectRole, EntryId>,
}

impl Record {
    /// Create an empty record. Subject identities are assigned up front; their
    /// person resources are created on demand by [`Record::ensure_person`].
    pub fn new(config: Arc<RecordConfig>) -> Self {
        let subjects: BTreeMap<SubjectRole, EntryId> = SubjectRole::ALL
            .iter()
            .map(|role| (*role, EntryId::generate()))
            .collect();

        let mut composition = Composition::new(EntryId::generate().to_string());
        composition.title = config.composition_title.clone();
        composition.subject = subjects.get(&SubjectRole::Child).map(|id| {
            Reference::new(format!("{}/{}", SubjectRole::Child.resource_kind(), id))
        });

        let mut bundle = Bundle::new(BundleType::Document);
        bundle.id = Some(EntryId::generate().to_string());

        Self {
            config,
            bundle,
            composition,
            subjects,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(Arc::new(RecordConfig::default()))
    }

    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn entry(&self, id: &EntryId) -> Option<&BundleEntry> {
        self.bundle.get(id)
    }

    pub fn resource(&self, id: &EntryId) -> Option<&Resource> {
        self.bundle.get(id).map(|e| &e.resource)
    }

    pub fn resource_mut(&mut self, id: &EntryId) -> Option<&mut Resource> {
        self.bundle.get_mut(id).map(|e| &mut e.resource)
    }

    /// Entry handles referenced by a section, empty if the section is absent
    pub fn section_entries(&self, section: &str) -> &[EntryId] {
        self.composition
            .section(section)
            .map(|s| s.entry.as_slice())
            .unwrap_or(&[])
    }

    pub fn subject_id(&self, role: SubjectRole) -> &EntryId {
        // Every role is assigned in `new`.
        &self.subjects[&role]
    }

    /// `Patient/<id>` or `RelatedPerson/<id>` for the role's person resource
    pub fn subject_reference(&self, role: SubjectRole) -> String {
        format!("{}/{}", role.resource_kind(), self.subject_id(role))
    }

    /// Create the person resource for `role` if it does not exist yet.
    ///
    /// Person resources belong to the bundle but not to any section.
    pub fn ensure_person(&mut self, role: SubjectRole, profile: Option<&str>) -> EntryId {
        let id = self.subject_id(role).clone();
        if self.bundle.get(&id).is_none() {
            let mut resource = Resource::new(role.resource_kind());
            resource.id = id.to_string();
            if let Some(profile) = profile {
                resource.assert_profile(profile);
            }
            if role == SubjectRole::Father {
                resource.additional.insert(
                    "patient".to_string(),
                    json!({ "reference": self.subject_reference(SubjectRole::Child) }),
                );
            }
            self.bundle.add_entry(BundleEntry::new(resource));
            debug!(role = %role, entry_id = %id, "created person resource");
        } else if let Some(profile) = profile {
            if let Some(resource) = self.resource_mut(&id) {
                resource.assert_profile(profile);
            }
        }
        id
    }

    /// The record as a self-contained document bundle: the composition is
    /// entry 0, followed by every resource entry in insertion order.
    pub fn to_document(&self) -> Result<JsonValue> {
        let mut document = self.bundle.to_value()?;
        let composition = json!({
            "fullUrl": format!("urn:uuid:{}", self.composition.id),
            "resource": serde_json::to_value(&self.composition)?,
        });

        if let Some(fields) = document.as_object_mut() {
            let entries = fields
                .entry("entry")
                .or_insert_with(|| JsonValue::Array(Vec::new()));
            if let Some(entries) = entries.as_array_mut() {
                entries.insert(0, composition);
            }
        }
        Ok(document)
    }
}
