//! Control group entities: rules, conditions and their input/output placeholders.
//!
//! A control group is a small decision graph. Conditions are boolean
//! predicates with a `true` and a `false` edge; each edge leads to another
//! condition or to a rule. Rules compute a setpoint for exactly one output.
//!
//! Entities here are plain data. Construction and validation of a whole group
//! lives in `rtc-graph`.
//!
//! # Edges
//!
//! Edges are written at most once ([`Edge::set_if_absent`]). Wiring code may
//! try to connect the same slot several times; only the first connection
//! sticks.

pub mod condition;
pub mod edge;
pub mod error;
pub mod placeholder;
pub mod quantity;
pub mod rule;

pub use condition::{Condition, ConditionDraft, ConditionKind, Operation};
pub use edge::{Edge, EdgeTarget};
pub use error::{ControlError, ControlResult};
pub use placeholder::{DataItem, Input, Output};
pub use quantity::{ElementSet, QuantityType};
pub use rule::{
    DeadBand, HydraulicRule, IntervalMode, IntervalRule, IntervalSetting, PidRule, PidSetpoint,
    PidSetting, RelativeTimeRule, Rule, RuleDraft, RuleKind, SetpointMode, TimeRule,
};
