//! Resource graph models
//!
//! This crate provides the strongly-typed structures a vital-records document
//! is built from: the bundle entry arena, resources, the composition table of
//! contents, extensions and coded values.
//!
//! # Module Organization
//!
//! - `common`: Version-agnostic models shared by every document profile
//!
//! # Design Philosophy
//!
//! - **Arena ownership**: the [`Bundle`] owns every resource; sections and
//!   references address entries through [`EntryId`] handles
//! - **Extensible**: `additional` fields capture content beyond core fields
//! - **Flexible**: Can serialize/deserialize to/from JSON
//!
//! # Example
//!
//! ```rust
//! use vitalis_models::common::{Bundle, BundleEntry, BundleType, Resource, ResourceKind};
//!
//! let mut bundle = Bundle::new(BundleType::Document);
//! let id = bundle.add_entry(BundleEntry::new(Resource::new(ResourceKind::Observation)));
//!
//! assert_eq!(bundle.entry_count(), 1);
//! assert!(bundle.get(&id).is_some());
//! ```

pub mod common;

// Re-export commonly used types
pub use common::*;
