//! Error types for the import pipeline.
//!
//! Only fatal problems are errors. Anything the importer can skip or degrade
//! is reported to the diagnostics sink instead.

use rtc_graph::GraphError;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ImportError {
    /// A record tag with no counterpart in the control model.
    #[error("{what} '{tag}' is not supported")]
    NotSupported { what: &'static str, tag: String },

    #[error("Controller '{controller}' has no {expected} properties")]
    MissingProperties {
        controller: String,
        expected: &'static str,
    },

    #[error("Control group construction failed: {0}")]
    Graph(#[from] GraphError),
}

impl ImportError {
    pub(crate) fn not_supported(what: &'static str, tag: impl Into<String>) -> Self {
        ImportError::NotSupported {
            what,
            tag: tag.into(),
        }
    }
}
