//! Condition variants.

use rtc_core::{InputId, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::edge::{Edge, EdgeTarget};
use crate::error::{ControlError, ControlResult};

/// Comparison applied to the measured input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Greater,
    Less,
}

impl Operation {
    /// Legacy tables encode the operator as a bit; set means "greater".
    pub fn from_greater_bit(greater: bool) -> Self {
        if greater {
            Operation::Greater
        } else {
            Operation::Less
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConditionKind {
    /// Step function of time; true inside the windows of the series.
    Time { series: TimeSeries<bool> },
    /// Compares the input against the threshold.
    Standard { operation: Operation },
    /// Compares the flow direction of the input.
    Directional { operation: Operation },
}

impl ConditionKind {
    pub fn is_time(&self) -> bool {
        matches!(self, ConditionKind::Time { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub long_name: String,
    pub true_output: Edge,
    pub false_output: Edge,
    pub input: Option<InputId>,
    pub threshold: f64,
    pub kind: ConditionKind,
}

impl Condition {
    pub fn from_draft(draft: &ConditionDraft) -> Self {
        Self {
            name: draft.name.clone(),
            long_name: draft.long_name.clone(),
            true_output: Edge::open(),
            false_output: Edge::open(),
            input: draft.input,
            threshold: draft.threshold,
            kind: draft.kind.clone(),
        }
    }

    /// Connect the true edge unless already connected.
    pub fn connect_true(&mut self, target: EdgeTarget) -> bool {
        self.true_output.set_if_absent(target)
    }

    /// Connect the false edge unless already connected.
    pub fn connect_false(&mut self, target: EdgeTarget) -> bool {
        self.false_output.set_if_absent(target)
    }

    /// Connect the true edge, failing when it already leads elsewhere.
    pub fn link_true(&mut self, target: EdgeTarget) -> ControlResult<()> {
        self.true_output
            .try_set(target)
            .map_err(|existing| self.already_set("true", existing, target))
    }

    /// Connect the false edge, failing when it already leads elsewhere.
    pub fn link_false(&mut self, target: EdgeTarget) -> ControlResult<()> {
        self.false_output
            .try_set(target)
            .map_err(|existing| self.already_set("false", existing, target))
    }

    pub fn has_open_edge(&self) -> bool {
        self.true_output.is_open() || self.false_output.is_open()
    }

    fn already_set(
        &self,
        edge: &'static str,
        existing: EdgeTarget,
        requested: EdgeTarget,
    ) -> ControlError {
        ControlError::EdgeAlreadySet {
            owner: self.name.clone(),
            edge,
            existing,
            requested,
        }
    }
}

/// A condition produced from one trigger, before it joins a control group.
///
/// `true_next` / `false_next` link to other drafts of the same batch by
/// position; the group turns them into edges when the batch is added.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionDraft {
    pub name: String,
    pub long_name: String,
    pub input: Option<InputId>,
    pub threshold: f64,
    pub kind: ConditionKind,
    pub true_next: Option<usize>,
    pub false_next: Option<usize>,
}

impl ConditionDraft {
    pub fn new(name: impl Into<String>, long_name: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            name: name.into(),
            long_name: long_name.into(),
            input: None,
            threshold: 0.0,
            kind,
            true_next: None,
            false_next: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}
