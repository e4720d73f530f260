//! rtc-import: legacy RTC records to control groups.
//!
//! For each structure the controllers are ordered so rules on the same
//! controlled parameter sit next to each other, turned into rules, guarded by
//! the conditions their triggers produce and collected into one
//! [`ControlGroup`](rtc_graph::ControlGroup). Skipped or degraded records are
//! reported to a [`DiagnosticsSink`](rtc_core::DiagnosticsSink).

pub mod assembler;
pub mod condition_factory;
pub mod error;
pub mod inputs;
pub mod merge;
pub mod orderer;
pub mod quantity;
pub mod rule_factory;
pub mod tables;
pub mod wiring;

pub use assembler::{ImportReport, StructureFailure, assemble_structure, import_all};
pub use condition_factory::build_conditions;
pub use error::{ImportError, ImportResult};
pub use inputs::{
    ZERO_THRESHOLD_PARAMETER, resolve_controller_input, resolve_output, resolve_trigger_input,
};
pub use merge::merge_into;
pub use orderer::order_controllers;
pub use rule_factory::build_rule;
pub use wiring::{Clause, Wiring, trigger_clauses, wire_rule};
