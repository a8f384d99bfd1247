//! Entry registry
//!
//! Find-or-create and lookup of coded entries, with the composition kept in
//! step: creating an entry adds its section reference, removing an entry drops
//! its references before the entry itself.

use crate::error::Result;
use crate::record::Record;
use crate::subject::SubjectRole;
use crate::urls::OBSERVATION_CATEGORY_SYSTEM;
use tracing::debug;
use vitalis_models::{
    BundleEntry, CodeableConcept, Coding, EntryId, Reference, Resource, ResourceKind,
};

/// Declarative description of one coded entry.
///
/// Built once per field and passed into every registry call for that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTemplate {
    pub kind: ResourceKind,
    pub code: String,
    pub system: String,
    pub display: String,
    pub profile: String,
    pub section: String,
    pub category: Option<Coding>,
    /// Overrides the section's default subject
    pub subject: Option<SubjectRole>,
}

impl EntryTemplate {
    pub fn new(
        kind: ResourceKind,
        code: impl Into<String>,
        system: impl Into<String>,
        display: impl Into<String>,
        profile: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            system: system.into(),
            display: display.into(),
            profile: profile.into(),
            section: section.into(),
            category: None,
            subject: None,
        }
    }

    /// An observation template
    pub fn observation(
        code: impl Into<String>,
        system: impl Into<String>,
        display: impl Into<String>,
        profile: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self::new(ResourceKind::Observation, code, system, display, profile, section)
    }

    pub fn with_category(mut self, category: Coding) -> Self {
        self.category = Some(category);
        self
    }

    /// Category from the observation-category code system
    pub fn with_observation_category(self, code: &str) -> Self {
        self.with_category(Coding::new(OBSERVATION_CATEGORY_SYSTEM, code, code))
    }

    pub fn with_subject(mut self, role: SubjectRole) -> Self {
        self.subject = Some(role);
        self
    }

    fn concept(&self) -> CodeableConcept {
        CodeableConcept::from_coding(Coding::new(
            self.system.clone(),
            self.code.clone(),
            self.display.clone(),
        ))
    }
}

/// First entry coded `code`, optionally restricted to a subject reference.
pub fn locate<'a>(record: &'a Record, code: &str, subject: Option<&str>) -> Option<&'a BundleEntry> {
    record.bundle.find(|resource| {
        resource.has_code(code)
            && subject.map_or(true, |s| resource.subject_reference() == Some(s))
    })
}

/// First entry coded `code` for `subject` that the named section references.
pub fn locate_in_section(
    record: &Record,
    code: &str,
    subject: Option<&str>,
    section: &str,
) -> Option<EntryId> {
    let members = record.section_entries(section);
    record
        .bundle
        .entries()
        .iter()
        .filter(|entry| members.contains(&entry.local_id()))
        .find(|entry| {
            entry.resource.has_code(code)
                && subject.map_or(true, |s| entry.resource.subject_reference() == Some(s))
        })
        .map(BundleEntry::local_id)
}

/// Subject reference used for `template` when the caller supplies none
pub fn default_subject(record: &Record, template: &EntryTemplate) -> Result<String> {
    let section = record.config().require_section(&template.section)?;
    let role = template.subject.unwrap_or(section.default_subject);
    Ok(record.subject_reference(role))
}

/// Return the entry for `template`, creating it on first use.
///
/// `subject` is a subject reference (`Patient/<id>`); when omitted the
/// template's role, then the section's default role, decides. Calling this
/// twice with the same arguments yields the same entry.
pub fn get_or_create(
    record: &mut Record,
    template: &EntryTemplate,
    subject: Option<&str>,
) -> Result<EntryId> {
    let subject = match subject {
        Some(subject) => {
            record.config().require_section(&template.section)?;
            subject.to_string()
        }
        None => default_subject(record, template)?,
    };

    if let Some(existing) = locate(record, &template.code, Some(&subject)) {
        return Ok(existing.local_id());
    }

    create(record, template, &subject)
}

/// Unconditionally add a new entry for `template` and reference it from the
/// template's section.
pub(crate) fn create(
    record: &mut Record,
    template: &EntryTemplate,
    subject: &str,
) -> Result<EntryId> {
    let definition = record.config().require_section(&template.section)?.clone();

    let mut resource = Resource::new(template.kind);
    resource.status = default_status(template.kind).map(str::to_string);
    resource.code = Some(template.concept());
    if let Some(category) = &template.category {
        resource.category = vec![CodeableConcept::from_coding(category.clone())];
    }
    resource.subject = Some(Reference::new(subject));
    if !template.profile.is_empty() {
        resource.assert_profile(template.profile.clone());
    }

    let id = record.bundle.add_entry(BundleEntry::new(resource));

    let section = record
        .composition
        .section_or_insert_with(&definition.id, || {
            debug!(section = %definition.id, "created composition section");
            definition.to_section()
        });
    section.entry.push(id.clone());

    debug!(
        code = %template.code,
        section = %template.section,
        entry_id = %id,
        "created entry"
    );
    Ok(id)
}

/// Remove the first entry coded `code` for `subject`, if any.
pub fn remove(record: &mut Record, code: &str, subject: Option<&str>) -> Option<EntryId> {
    let id = locate(record, code, subject)?.local_id();
    remove_entry(record, &id);
    Some(id)
}

/// Remove an entry by handle: section references first, then the entry.
///
/// Returns false if the record holds no such entry.
pub fn remove_entry(record: &mut Record, id: &EntryId) -> bool {
    let references = record.composition.remove_references(id);
    let removed = record.bundle.remove(id).is_some();
    if removed {
        debug!(entry_id = %id, references, "removed entry");
    }
    removed
}

fn default_status(kind: ResourceKind) -> Option<&'static str> {
    match kind {
        ResourceKind::Observation => Some("final"),
        ResourceKind::Procedure => Some("completed"),
        ResourceKind::Coverage | ResourceKind::Encounter => Some("active"),
        _ => None,
    }
}
