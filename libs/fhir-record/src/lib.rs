//! Vital-records resource graph engine
//!
//! This crate keeps a clinical document consistent while named field
//! accessors read and write it. A [`Record`] owns the bundle of coded entries
//! and the composition that indexes them by section; every operation takes
//! the record explicitly.
//!
//! - [`registry`]: find-or-create of coded entries with section bookkeeping
//! - [`finding`]: boolean findings modelled as entry existence
//! - [`partial_date`]: dates whose fragments may be known, unknown or unset
//! - [`concept`]: coded concept dictionaries and the code-only helper layer
//! - [`edit_flag`]: data-quality bypass flags on entry values
//! - [`tabulated`]: catalogues of named components on one shared entry
//!
//! # Example
//!
//! ```rust
//! use vitalis_record::registry::{self, EntryTemplate};
//! use vitalis_record::{edit_flag, CodeDictionary, Record};
//! use vitalis_models::Value;
//!
//! # fn main() -> vitalis_record::Result<()> {
//! let mut record = Record::with_default_config();
//! let apgar = EntryTemplate::observation(
//!     "9274-2",
//!     "http://loinc.org",
//!     "5 minute Apgar Score",
//!     "",
//!     "newborn-information",
//! );
//!
//! let id = registry::get_or_create(&mut record, &apgar, None)?;
//! if let Some(resource) = record.resource_mut(&id) {
//!     resource.set_value(Value::Integer(9));
//! }
//! edit_flag::set_flag(&mut record, &id, &CodeDictionary::from_triple("0", "", "Edit Passed"))?;
//!
//! assert_eq!(record.resource(&id).and_then(|r| r.value()), Some(&Value::Integer(9)));
//! assert_eq!(edit_flag::get_flag(&record, &id)?.code(), "0");
//! # Ok(())
//! # }
//! ```

pub mod concept;
pub mod config;
pub mod edit_flag;
pub mod error;
pub mod finding;
pub mod partial_date;
pub mod record;
pub mod registry;
pub mod subject;
pub mod tabulated;
pub mod urls;

pub use concept::CodeDictionary;
pub use config::{RecordConfig, SectionDefinition};
pub use error::{Error, Result};
pub use finding::FindingTemplate;
pub use partial_date::{DatePart, Fragment, PartialDateCodec, PartialDateTime};
pub use record::Record;
pub use registry::EntryTemplate;
pub use subject::SubjectRole;
pub use tabulated::{CatalogueItem, ComponentCatalogue, ComponentKind};
