//! Write-once edge slots.

use std::fmt;

use rtc_core::{ConditionId, RuleId};
use serde::{Deserialize, Serialize};

/// Where an edge of a condition leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum EdgeTarget {
    Condition(ConditionId),
    Rule(RuleId),
}

impl fmt::Display for EdgeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeTarget::Condition(id) => write!(f, "condition {id}"),
            EdgeTarget::Rule(id) => write!(f, "rule {id}"),
        }
    }
}

/// An optional edge that, once connected, is never redirected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Edge(Option<EdgeTarget>);

impl Edge {
    pub fn open() -> Self {
        Self(None)
    }

    pub fn target(&self) -> Option<EdgeTarget> {
        self.0
    }

    pub fn is_open(&self) -> bool {
        self.0.is_none()
    }

    /// Connect the edge unless it already leads somewhere.
    ///
    /// Returns `true` when the edge was connected by this call.
    pub fn set_if_absent(&mut self, target: EdgeTarget) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(target);
        true
    }

    /// Connect the edge, reporting the existing target when already connected.
    pub fn try_set(&mut self, target: EdgeTarget) -> Result<(), EdgeTarget> {
        match self.0 {
            Some(existing) => Err(existing),
            None => {
                self.0 = Some(target);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_target_wins() {
        let a = EdgeTarget::Condition(ConditionId::from_index(0));
        let b = EdgeTarget::Rule(RuleId::from_index(3));

        let mut edge = Edge::open();
        assert!(edge.is_open());
        assert!(edge.set_if_absent(a));
        assert!(!edge.set_if_absent(b));
        assert_eq!(edge.target(), Some(a));
    }

    #[test]
    fn try_set_reports_existing() {
        let a = EdgeTarget::Rule(RuleId::from_index(0));
        let b = EdgeTarget::Rule(RuleId::from_index(1));

        let mut edge = Edge::default();
        edge.try_set(a).unwrap();
        assert_eq!(edge.try_set(b), Err(a));
        assert_eq!(edge.target(), Some(a));
    }
}
