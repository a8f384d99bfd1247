//! Edit-flag overlay
//!
//! A bypass flag records that a data-quality edit was overridden for an
//! entry's value. It lives as an extension on the value element, so it can
//! be set before the value is known and never disturbs the value payload.

use crate::concept::{from_dict, to_dict, CodeDictionary};
use crate::error::{Error, Result};
use crate::record::Record;
use tracing::debug;
use vitalis_models::{EntryId, Extension, Resource, Value};

/// The flag on `resource`'s value, or an empty dictionary
pub fn read_flag(resource: &Resource, url: &str) -> CodeDictionary {
    let flag = resource
        .value
        .as_ref()
        .and_then(|element| element.find_extension(url));
    match flag {
        Some(ext) => to_dict(ext.value.as_ref().and_then(Value::as_codeable_concept)),
        None => CodeDictionary::default(),
    }
}

/// Replace the flag on `resource`'s value, creating a placeholder value
/// element when the resource has none.
pub fn write_flag(resource: &mut Resource, url: &str, flag: &CodeDictionary) {
    let element = resource.value_element_mut();
    element.remove_extensions(url);
    element
        .extension
        .push(Extension::with_value(url, Value::CodeableConcept(from_dict(flag))));
}

/// Remove the flag from `resource`'s value. Returns whether one was present.
pub fn remove_flag(resource: &mut Resource, url: &str) -> bool {
    let Some(element) = resource.value.as_mut() else {
        return false;
    };
    let removed = element.remove_extensions(url) > 0;
    if element.is_empty() {
        resource.value = None;
    }
    removed
}

pub fn get_flag(record: &Record, id: &EntryId) -> Result<CodeDictionary> {
    let resource = record
        .resource(id)
        .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
    Ok(read_flag(resource, &record.config().edit_flag_url))
}

pub fn set_flag(record: &mut Record, id: &EntryId, flag: &CodeDictionary) -> Result<()> {
    let url = record.config().edit_flag_url.clone();
    let resource = record
        .resource_mut(id)
        .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
    write_flag(resource, &url, flag);
    debug!(entry_id = %id, flag = flag.code(), "set edit flag");
    Ok(())
}

pub fn clear_flag(record: &mut Record, id: &EntryId) -> Result<bool> {
    let url = record.config().edit_flag_url.clone();
    let resource = record
        .resource_mut(id)
        .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
    Ok(remove_flag(resource, &url))
}
