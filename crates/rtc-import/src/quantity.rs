//! Mapping of legacy parameter tags to model quantities.

use rtc_controls::QuantityType;
use rtc_records::{ControlledParameter, MeasurementParameter, StructureKind, TriggerParameter};

use crate::error::{ImportError, ImportResult};

/// Gate height is a valve opening on culverts and the lower edge level elsewhere.
fn gate_height(kind: StructureKind) -> QuantityType {
    match kind {
        StructureKind::Culvert => QuantityType::ValveOpening,
        _ => QuantityType::GateLowerEdgeLevel,
    }
}

/// Quantity a controller writes on its structure.
pub fn controlled_quantity(
    kind: StructureKind,
    parameter: &ControlledParameter,
) -> ImportResult<QuantityType> {
    match parameter {
        ControlledParameter::CrestLevel => Ok(QuantityType::CrestLevel),
        ControlledParameter::CrestWidth => Ok(QuantityType::CrestWidth),
        ControlledParameter::GateHeight => Ok(gate_height(kind)),
        ControlledParameter::PumpCapacity => Ok(QuantityType::PumpCapacity),
        ControlledParameter::BottomLevel2DGridCell => Err(ImportError::not_supported(
            "controlled parameter",
            "BottomLevel2DGridCell",
        )),
        ControlledParameter::Other(tag) => {
            Err(ImportError::not_supported("controlled parameter", tag))
        }
    }
}

/// Quantity a hydraulic trigger checks.
pub fn trigger_quantity(
    kind: StructureKind,
    parameter: &TriggerParameter,
) -> ImportResult<QuantityType> {
    match parameter {
        TriggerParameter::WaterLevelBranchLocation => Ok(QuantityType::WaterLevel),
        TriggerParameter::HeadDifferenceStructure => Ok(QuantityType::Head),
        TriggerParameter::DischargeBranchLocation => Ok(QuantityType::Discharge),
        TriggerParameter::GateHeightStructure => Ok(gate_height(kind)),
        TriggerParameter::CrestLevelStructure => Ok(QuantityType::CrestLevel),
        TriggerParameter::CrestWidthStructure => Ok(QuantityType::CrestWidth),
        TriggerParameter::WaterlevelRetentionArea => Ok(QuantityType::WaterLevel),
        TriggerParameter::PressureDifferenceStructure => Ok(QuantityType::PressureDifference),
        TriggerParameter::Other(tag) => Err(ImportError::not_supported("trigger parameter", tag)),
    }
}

/// Quantity a controller measures at its measurement location.
pub fn measured_quantity(parameter: &MeasurementParameter) -> ImportResult<QuantityType> {
    match parameter {
        MeasurementParameter::WaterLevel => Ok(QuantityType::WaterLevel),
        MeasurementParameter::Discharge => Ok(QuantityType::Discharge),
        MeasurementParameter::HeadDifference => Ok(QuantityType::Head),
        MeasurementParameter::Velocity => Ok(QuantityType::Velocity),
        // direction is read from the sign of the discharge
        MeasurementParameter::FlowDirection => Ok(QuantityType::Discharge),
        MeasurementParameter::PressureDifference => Ok(QuantityType::PressureDifference),
        MeasurementParameter::Other(tag) => {
            Err(ImportError::not_supported("measurement parameter", tag))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_height_depends_on_structure_kind() {
        assert_eq!(
            controlled_quantity(StructureKind::Culvert, &ControlledParameter::GateHeight).unwrap(),
            QuantityType::ValveOpening
        );
        assert_eq!(
            controlled_quantity(StructureKind::Orifice, &ControlledParameter::GateHeight).unwrap(),
            QuantityType::GateLowerEdgeLevel
        );
        assert_eq!(
            trigger_quantity(StructureKind::Culvert, &TriggerParameter::GateHeightStructure)
                .unwrap(),
            QuantityType::ValveOpening
        );
    }

    #[test]
    fn unmapped_tags_not_supported() {
        let err =
            controlled_quantity(StructureKind::Weir, &ControlledParameter::BottomLevel2DGridCell)
                .unwrap_err();
        assert_eq!(
            err,
            ImportError::NotSupported {
                what: "controlled parameter",
                tag: "BottomLevel2DGridCell".into()
            }
        );

        assert!(matches!(
            trigger_quantity(StructureKind::Weir, &TriggerParameter::Other("Salinity".into())),
            Err(ImportError::NotSupported { .. })
        ));
    }

    #[test]
    fn flow_direction_reads_discharge() {
        assert_eq!(
            measured_quantity(&MeasurementParameter::FlowDirection).unwrap(),
            QuantityType::Discharge
        );
        assert_eq!(
            measured_quantity(&MeasurementParameter::HeadDifference).unwrap(),
            QuantityType::Head
        );
    }
}
