//! Import document schema.
//!
//! One document carries everything one import pass needs: the structure
//! mappings, the controller and trigger records they refer to, and the
//! catalogue of model data items the records are resolved against.

use chrono::NaiveDateTime;
use rtc_controls::{ElementSet, QuantityType};
use rtc_core::Interpolation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub structures: Vec<StructureMapping>,
    #[serde(default)]
    pub controllers: Vec<ControllerRecord>,
    #[serde(default)]
    pub triggers: Vec<TriggerRecord>,
    #[serde(default)]
    pub catalogue: Vec<CatalogueEntry>,
}

impl ImportDocument {
    pub fn controller(&self, id: &str) -> Option<&ControllerRecord> {
        self.controllers.iter().find(|c| c.id == id)
    }

    pub fn trigger(&self, id: &str) -> Option<&TriggerRecord> {
        self.triggers.iter().find(|t| t.id == id)
    }
}

/// A structure and the controllers acting on it, in file order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureMapping {
    pub structure_id: String,
    #[serde(default)]
    pub name: String,
    pub kind: StructureKind,
    #[serde(default)]
    pub controller_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StructureKind {
    Weir,
    Orifice,
    Culvert,
    Pump,
    GeneralStructure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ControllerType {
    Time,
    Hydraulic,
    Interval,
    Pid,
    RelativeTime,
    RelativeFromValue,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ControlledParameter {
    CrestLevel,
    CrestWidth,
    GateHeight,
    PumpCapacity,
    BottomLevel2DGridCell,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MeasurementParameter {
    WaterLevel,
    Discharge,
    HeadDifference,
    Velocity,
    FlowDirection,
    PressureDifference,
    #[serde(untagged)]
    Other(String),
}

/// Extrapolation requested by a record; a periodic period comes separately.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ExtrapolationKind {
    None,
    #[default]
    Constant,
    Linear,
    Periodic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeValueRow {
    pub time: NaiveDateTime,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LookupRow {
    pub argument: f64,
    pub value: f64,
}

/// Reference from a controller to a trigger guarding it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerRef {
    pub id: String,
    /// `true`: must hold together with the previous trigger; `false`: closes the clause.
    #[serde(default = "default_true")]
    pub and: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub controller_type: ControllerType,
    pub controlled_parameter: ControlledParameter,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub extrapolation: ExtrapolationKind,
    /// `'D;HH:MM:SS'` or seconds; empty when not periodic.
    #[serde(default)]
    pub extrapolation_period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_table: Option<Vec<TimeValueRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_table: Option<Vec<LookupRow>>,
    #[serde(default)]
    pub positive_stream: f64,
    #[serde(default)]
    pub negative_stream: f64,
    #[serde(default)]
    pub minimum_period: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_station_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_parameter: Option<MeasurementParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ControllerProperties>,
    #[serde(default)]
    pub triggers: Vec<TriggerRef>,
}

impl ControllerRecord {
    /// Record with every optional field left empty.
    pub fn new(
        id: impl Into<String>,
        controller_type: ControllerType,
        controlled_parameter: ControlledParameter,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            controller_type,
            controlled_parameter,
            interpolation: Interpolation::default(),
            extrapolation: ExtrapolationKind::default(),
            extrapolation_period: String::new(),
            time_table: None,
            lookup_table: None,
            positive_stream: 0.0,
            negative_stream: 0.0,
            minimum_period: 0,
            measurement_station_id: None,
            structure_id: None,
            measurement_parameter: None,
            properties: None,
            triggers: Vec::new(),
        }
    }
}

/// Controller-type specific settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ControllerProperties {
    Hydraulic {
        #[serde(default)]
        time_lag: i64,
    },
    Interval(IntervalProperties),
    Pid(PidProperties),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeadBandType {
    Fixed,
    PercentageDischarge,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntervalType {
    Fixed,
    Variable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SetpointType {
    Constant,
    Series,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntervalProperties {
    pub dead_band_min: f64,
    pub dead_band_max: f64,
    pub setting_below: f64,
    pub setting_above: f64,
    pub max_speed: f64,
    pub dead_band_type: DeadBandType,
    #[serde(default)]
    pub dead_band_fixed_size: f64,
    #[serde(default)]
    pub dead_band_percentage: f64,
    pub interval_type: IntervalType,
    #[serde(default)]
    pub fixed_interval: f64,
    pub setpoint_type: SetpointType,
    #[serde(default)]
    pub constant_setpoint: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PidProperties {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub setting_min: f64,
    pub setting_max: f64,
    pub max_speed: f64,
    #[serde(default)]
    pub initial_value: f64,
    /// Absent means the setpoint comes from the controller's time table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_setpoint: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TriggerType {
    Time,
    Hydraulic,
    Combined,
    #[serde(untagged)]
    Other(String),
}

/// Measured location and quantity a hydraulic trigger checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TriggerParameter {
    WaterLevelBranchLocation,
    HeadDifferenceStructure,
    DischargeBranchLocation,
    GateHeightStructure,
    CrestLevelStructure,
    CrestWidthStructure,
    WaterlevelRetentionArea,
    PressureDifferenceStructure,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CheckOn {
    #[default]
    Value,
    Direction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TriggerRow {
    pub time: NaiveDateTime,
    /// Time triggers: whether the trigger is on from this time.
    #[serde(default)]
    pub on: bool,
    /// Hydraulic triggers: set means "greater than".
    #[serde(default, alias = "operator_bit")]
    pub greater: bool,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub trigger_type: TriggerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<TriggerParameter>,
    #[serde(default)]
    pub check_on: CheckOn,
    #[serde(default)]
    pub rows: Vec<TriggerRow>,
    #[serde(default)]
    pub periodic_extrapolation_period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_station_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_id: Option<String>,
}

impl TriggerRecord {
    /// Record with no rows and no location.
    pub fn new(id: impl Into<String>, trigger_type: TriggerType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            trigger_type,
            parameter: None,
            check_on: CheckOn::default(),
            rows: Vec::new(),
            periodic_extrapolation_period: String::new(),
            measurement_station_id: None,
            structure_id: None,
        }
    }
}

/// One data item the model exposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogueEntry {
    pub feature: String,
    pub parameter_name: String,
    pub quantity: QuantityType,
    pub element_set: ElementSet,
    /// Can be read by rules and conditions.
    #[serde(default = "default_true")]
    pub readable: bool,
    /// Can be written by rules.
    #[serde(default)]
    pub controllable: bool,
}
