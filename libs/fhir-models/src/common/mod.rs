//! Version-agnostic resource graph models
//!
//! Types shared by every vital-records document profile

pub mod bundle;
pub mod complex;
pub mod composition;
pub mod error;
pub mod resource;
pub mod value_set;

// Re-export commonly used types
pub use bundle::*;
pub use complex::*;
pub use composition::*;
pub use error::{Error, Result};
pub use resource::*;
pub use value_set::*;
