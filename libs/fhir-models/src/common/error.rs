//! Error types for resource graph models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("Invalid field value: {0}")]
    InvalidFieldValue(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
