//! rtc-core: stable foundation for the RTC importer.
//!
//! Contains:
//! - ids (compact ids for control group entities)
//! - error (shared error types)
//! - series (ordered argument/value tables, time series, lookup tables)
//! - period (legacy periodic extrapolation period strings)
//! - diagnostics (warning/error sink passed into graph construction)

pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod period;
pub mod series;

// Re-exports: nice ergonomics for downstream crates
pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsSink, Severity, TracingSink};
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use period::parse_period;
pub use series::{Extrapolation, Interpolation, LookupTable, Table, TimeSeries};
