//! Rule variants.
//!
//! A rule computes a setpoint for one output. The variant decides how:
//! from a time series, from a measured input through a lookup table, by an
//! interval controller, by a PID controller, or relative to elapsed time.

use rtc_core::{InputId, LookupTable, OutputId, TimeSeries};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub long_name: String,
    pub input: Option<InputId>,
    pub output: OutputId,
    pub kind: RuleKind,
}

impl Rule {
    pub fn from_draft(draft: RuleDraft, output: OutputId) -> Self {
        Self {
            name: draft.name,
            long_name: draft.long_name,
            input: draft.input,
            output,
            kind: draft.kind,
        }
    }
}

/// A rule before it joins a control group.
///
/// The group assigns the output and makes the name unique.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDraft {
    pub name: String,
    pub long_name: String,
    pub input: Option<InputId>,
    pub kind: RuleKind,
}

impl RuleDraft {
    pub fn new(name: impl Into<String>, long_name: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            name: name.into(),
            long_name: long_name.into(),
            input: None,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleKind {
    Time(TimeRule),
    Hydraulic(HydraulicRule),
    Interval(IntervalRule),
    Pid(PidRule),
    RelativeTime(RelativeTimeRule),
}

impl RuleKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleKind::Time(_) => "time",
            RuleKind::Hydraulic(_) => "hydraulic",
            RuleKind::Interval(_) => "interval",
            RuleKind::Pid(_) => "pid",
            RuleKind::RelativeTime(r) if r.from_value => "relative from value",
            RuleKind::RelativeTime(_) => "relative time",
        }
    }
}

/// Setpoint read from a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRule {
    pub setpoints: TimeSeries<f64>,
}

/// Setpoint looked up from the measured input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicRule {
    pub table: LookupTable,
    pub time_lag_seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalSetting {
    pub min: f64,
    pub max: f64,
    /// Setting step applied below the dead band.
    pub below: f64,
    /// Setting step applied above the dead band.
    pub above: f64,
    pub max_speed: f64,
}

/// Dead band around the setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeadBand {
    Fixed { size: f64 },
    PercentageDischarge { percentage: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntervalMode {
    Fixed { step: f64 },
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetpointMode {
    Constant,
    Series,
}

/// Interval controller; the constant setpoint is the default value of `setpoints`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRule {
    pub setting: IntervalSetting,
    pub dead_band: DeadBand,
    pub interval: IntervalMode,
    pub setpoint_mode: SetpointMode,
    pub setpoints: TimeSeries<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidSetting {
    pub min: f64,
    pub max: f64,
    pub max_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PidSetpoint {
    Constant { value: f64 },
    Series { series: TimeSeries<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidRule {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub setting: PidSetting,
    pub setpoint: PidSetpoint,
}

/// Setpoint as a function of time elapsed since activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeTimeRule {
    pub table: LookupTable,
    pub minimum_period_seconds: i64,
    /// Start from the current output value instead of the table start.
    pub from_value: bool,
}
