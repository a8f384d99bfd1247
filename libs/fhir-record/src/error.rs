//! Error types for the record engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown component code: {0}")]
    UnknownComponent(String),

    #[error("Unknown subject role: {0}")]
    UnknownRole(String),

    #[error("Unknown value set: {0}")]
    UnknownValueSet(String),

    #[error("Invalid value '{value}' for component {code}")]
    InvalidComponentValue { code: String, value: String },

    #[error("Invalid date fragment value: {0}")]
    InvalidFragment(i64),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model error: {0}")]
    Model(#[from] vitalis_models::Error),
}
