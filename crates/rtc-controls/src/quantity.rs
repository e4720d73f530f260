//! Model quantities and element sets that data items are looked up by.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical quantity a data item exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityType {
    WaterLevel,
    Discharge,
    Head,
    Velocity,
    PressureDifference,
    CrestLevel,
    CrestWidth,
    GateLowerEdgeLevel,
    ValveOpening,
    PumpCapacity,
}

impl QuantityType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuantityType::WaterLevel => "WaterLevel",
            QuantityType::Discharge => "Discharge",
            QuantityType::Head => "Head",
            QuantityType::Velocity => "Velocity",
            QuantityType::PressureDifference => "PressureDifference",
            QuantityType::CrestLevel => "CrestLevel",
            QuantityType::CrestWidth => "CrestWidth",
            QuantityType::GateLowerEdgeLevel => "GateLowerEdgeLevel",
            QuantityType::ValveOpening => "ValveOpening",
            QuantityType::PumpCapacity => "PumpCapacity",
        }
    }
}

impl fmt::Display for QuantityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family of model features a data item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementSet {
    Structures,
    Pumps,
    Observations,
}

impl fmt::Display for ElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementSet::Structures => "Structures",
            ElementSet::Pumps => "Pumps",
            ElementSet::Observations => "Observations",
        };
        f.write_str(s)
    }
}
