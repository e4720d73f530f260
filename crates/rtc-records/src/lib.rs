//! rtc-records: legacy RTC records as an import document, with load/save and validation.

pub mod catalogue;
pub mod migrate;
pub mod schema;
pub mod validate;

pub use catalogue::{DataItemCatalogue, DataItemResolver};
pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_document};

use std::path::Path;

pub type RecordsResult<T> = Result<T, RecordsError>;

#[derive(thiserror::Error, Debug)]
pub enum RecordsError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Unknown document format for '{path}' (expected .yaml, .yml or .json)")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn finish_load(document: ImportDocument) -> RecordsResult<ImportDocument> {
    let document = migrate_to_latest(document)?;
    validate_document(&document)?;
    Ok(document)
}

pub fn from_yaml_str(content: &str) -> RecordsResult<ImportDocument> {
    finish_load(serde_yaml::from_str(content)?)
}

pub fn from_json_str(content: &str) -> RecordsResult<ImportDocument> {
    finish_load(serde_json::from_str(content)?)
}

pub fn load_yaml(path: &Path) -> RecordsResult<ImportDocument> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, document: &ImportDocument) -> RecordsResult<()> {
    validate_document(document)?;
    let content = serde_yaml::to_string(document)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> RecordsResult<ImportDocument> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn save_json(path: &Path, document: &ImportDocument) -> RecordsResult<()> {
    validate_document(document)?;
    let content = serde_json::to_string_pretty(document)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by file extension.
pub fn load(path: &Path) -> RecordsResult<ImportDocument> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(RecordsError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}
