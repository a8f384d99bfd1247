//! Subject roles
//!
//! Every entry is about one of the people a birth record describes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vitalis_models::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectRole {
    Mother,
    Father,
    Child,
}

impl SubjectRole {
    pub const ALL: [SubjectRole; 3] = [SubjectRole::Mother, SubjectRole::Father, SubjectRole::Child];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectRole::Mother => "mother",
            SubjectRole::Father => "father",
            SubjectRole::Child => "child",
        }
    }

    /// Kind of the person resource that represents this role
    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            SubjectRole::Mother | SubjectRole::Child => ResourceKind::Patient,
            SubjectRole::Father => ResourceKind::RelatedPerson,
        }
    }
}

impl fmt::Display for SubjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mother" => Ok(SubjectRole::Mother),
            "father" => Ok(SubjectRole::Father),
            "child" | "newborn" | "decedent-fetus" => Ok(SubjectRole::Child),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }
}
