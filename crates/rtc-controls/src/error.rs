//! Error types for control group entities.

use thiserror::Error;

use crate::edge::EdgeTarget;

pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// A strict link hit an edge that was already connected.
    #[error("{edge} edge of condition '{owner}' already leads to {existing}, cannot link it to {requested}")]
    EdgeAlreadySet {
        owner: String,
        edge: &'static str,
        existing: EdgeTarget,
        requested: EdgeTarget,
    },
}
