//! Control group construction and validation errors.

use rtc_controls::{ControlError, EdgeTarget};
use rtc_core::{ConditionId, InputId, OutputId};
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// An edge leads to a condition or rule that doesn't exist.
    #[error("Condition '{condition}' has an edge to non-existent {target}")]
    DanglingEdge {
        condition: String,
        target: EdgeTarget,
    },

    /// A rule or condition refers to an input that doesn't exist.
    #[error("'{owner}' refers to non-existent input {input}")]
    InvalidInputRef { owner: String, input: InputId },

    /// A rule refers to an output that doesn't exist.
    #[error("Rule '{rule}' refers to non-existent output {output}")]
    InvalidOutputRef { rule: String, output: OutputId },

    /// A condition id not owned by this group.
    #[error("Condition {id} not found")]
    ConditionNotFound { id: ConditionId },

    /// A draft links to a position outside its batch.
    #[error("Condition draft '{name}' links to position {position} of a batch of {len}")]
    DraftLinkOutOfRange {
        name: String,
        position: usize,
        len: usize,
    },

    /// Following edges from this condition leads back to it.
    #[error("Condition graph has a cycle through '{condition}'")]
    Cycle { condition: String },

    #[error(transparent)]
    Control(#[from] ControlError),
}
