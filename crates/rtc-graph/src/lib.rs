//! rtc-graph: control group construction for the RTC importer.
//!
//! Provides:
//! - Incremental [`ControlGroupBuilder`] with input/output deduplication and
//!   unique naming of rules and conditions
//! - Validated, immutable [`ControlGroup`] with decision-graph queries
//!
//! # Example
//!
//! ```
//! use rtc_controls::{
//!     ConditionDraft, ConditionKind, DataItem, EdgeTarget, ElementSet, HydraulicRule,
//!     Operation, QuantityType, RuleDraft, RuleKind,
//! };
//! use rtc_core::LookupTable;
//! use rtc_graph::ControlGroupBuilder;
//!
//! let mut builder = ControlGroupBuilder::new("weir1");
//! let output = builder.ensure_output(DataItem::new(
//!     "weir1",
//!     "Crest level",
//!     QuantityType::CrestLevel,
//!     ElementSet::Structures,
//! ));
//! let rule = builder.add_rule(
//!     RuleDraft::new(
//!         "c1",
//!         "Crest controller",
//!         RuleKind::Hydraulic(HydraulicRule {
//!             table: LookupTable::default(),
//!             time_lag_seconds: 0,
//!         }),
//!     ),
//!     output,
//! );
//! let conditions = builder
//!     .add_conditions(vec![ConditionDraft::new(
//!         "t1",
//!         "High water",
//!         ConditionKind::Standard { operation: Operation::Greater },
//!     )])
//!     .unwrap();
//! builder.connect_true(conditions[0], EdgeTarget::Rule(rule)).unwrap();
//!
//! let group = builder.build().unwrap();
//! assert_eq!(group.name(), "Control group of weir1");
//! assert_eq!(group.paths_to_rule(rule).len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod naming;
pub(crate) mod validate;

pub use builder::ControlGroupBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{ControlGroup, GroupNode, PathStep};
